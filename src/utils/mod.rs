//! Utils Module - Helper Functions & Shared Utilities
//!
//! Constants, the token report cache, calldata decoding and scan counters.

pub mod cache;
pub mod constants;
pub mod decoder;
pub mod telemetry;

pub use cache::*;
pub use constants::*;
pub use decoder::*;
pub use telemetry::*;
