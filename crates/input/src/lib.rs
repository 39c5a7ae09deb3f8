//! Input source: per-frame keyboard and pointer samples.
//!
//! # Invariants
//! - Consumers only read already-sampled values; nothing here polls a device.
//! - While the debug overlay captures a device, that device reads as idle.

pub mod state;

pub use state::{InputState, Key};
