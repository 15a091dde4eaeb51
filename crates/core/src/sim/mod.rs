//! Testbench file exchange.
//!
//! Reads and writes the per-pixel hex record files shared with the HDL
//! simulation.

/// Hex record file loading and writing.
pub mod loader;
