//! Single-target probing.
//!
//! A probe never fails: client errors and timeouts are turned into offline
//! results here.

mod prober;
mod result;

pub use prober::{Prober, round_ms};
pub use result::{Players, ProbeResult, UNKNOWN_VERSION, VariantDetails};
