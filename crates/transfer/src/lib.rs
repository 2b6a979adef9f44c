//! Queued, interrupt-driven I2S transfer manager
//!
//! One [`I2sUnit`] per physical peripheral owns the hardware, a bounded FIFO
//! of pending transfers and the configuration of every logical [`I2s`]
//! handle bound to it. Handles describe transfers with a
//! [`TransferBuilder`]; the unit starts them one at a time, switching the
//! register configuration between handles only when the owner changes.
//!
//! # Architecture
//!
//! ```text
//! I2s handle ──begin_transfer()──▶ TransferBuilder ──commit/drop──▶ I2sUnit
//!                                                                     │
//!          ┌──────────── critical_section::Mutex<RefCell<Session>> ───┤
//!          │  queue (heapless) · config registry · busy/idle state    │
//!          └──────────────────────────────────────────────────────────┘
//!                                                                     │
//! I2S interrupt ──on_interrupt()──▶ Session ──try_send──▶ CompletionChannel
//!                                                                     │
//!                          run_completions / drain_completions ◀──────┘
//!                                 (thread mode, runs callbacks)
//! ```
//!
//! # Features
//!
//! - `std`: host builds and the `platform` mocks
//! - `defmt`: defmt::Format derives and state-machine logging

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(unused_must_use)]
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(any(test, feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod builder;
pub mod config;
pub mod config_cache;
pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod handle;
pub mod unit;

mod queue;
mod session;

pub use builder::TransferBuilder;
pub use config::{COMPLETION_CHANNEL_DEPTH, DEFAULT_HANDLE_SLOTS, DEFAULT_QUEUE_DEPTH};
pub use config_cache::HandleId;
pub use descriptor::{EventCallback, TransferDescriptor};
pub use dispatch::{drain_completions, run_completions, Completion, CompletionChannel, Dispatcher};
pub use error::TransferError;
pub use handle::I2s;
pub use session::{Submission, TransferStats, TransferStatus};
pub use unit::{I2sUnit, UnitId};
