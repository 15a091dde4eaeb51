//! # Unit Tests
//!
//! One module per area of the core crate, from the codec up to the full
//! verification run.




/// Hex file loading, padding and writing.
pub mod loader;
