//! Compile-time sizing of the transfer manager
//!
//! Everything here is a default for a const generic; a unit that needs a
//! different size names it explicitly in its type.

/// Pending transfers a unit can hold while one is running.
pub const DEFAULT_QUEUE_DEPTH: usize = 16;

/// Logical handles that can be bound to one physical unit at a time.
pub const DEFAULT_HANDLE_SLOTS: usize = 4;

/// Completion notifications that can wait for the foreground task.
///
/// Two per running transfer (TX and RX) plus headroom for half-complete
/// events of a circular stream.
pub const COMPLETION_CHANNEL_DEPTH: usize = 8;
