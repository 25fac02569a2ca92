//! Providers Module - External Data Sources
//!
//! Threat feed and token security clients, each behind a trait so the
//! engine can be driven by in-process sources in tests.

pub mod goplus;
pub mod threat_feed;

pub use goplus::*;
pub use threat_feed::*;
