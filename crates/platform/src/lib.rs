//! Hardware abstraction for the I2S transfer manager
//!
//! This crate holds the contracts the transfer manager consumes from the
//! register-level driver, and the value types that cross that boundary. It
//! contains no transfer logic.
//!
//! # Architecture Layers
//!
//! ```text
//! Firmware (owns statics, routes I2S interrupts)
//!         ↓
//! transfer (queue, state machine, builder, deferred callbacks)
//!         ↓
//! platform (this crate - trait abstractions)
//!         ↓
//! Register-level I2S/DMA driver
//! ```
//!
//! # Modules
//!
//! - [`dma`] - buffer views handed to the hardware
//! - [`i2s`] - [`I2sHardware`] trait, channels and event masks
//! - [`i2s_config`] - validated peripheral configuration
//! - `mocks` - recording hardware double (`test` / `std` only)
//!
//! # Features
//!
//! - `std`: Enable standard library support and the mocks (for testing)
//! - `defmt`: Enable defmt::Format derives

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
#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod dma;
pub mod i2s;
pub mod i2s_config;
pub mod mocks;

pub use dma::{DmaBuffer, DmaBufferMut, DmaSlice};
pub use i2s::{EventMask, I2sChannel, I2sHardware, StartRequest};
pub use i2s_config::{I2sConfig, I2sFormat, I2sMode, I2sProtocol, OutOfRangeError, Polarity, SampleRateHz};
