//! Tracing subscriber setup shared by pingcraft binaries.

mod tracing;

pub use crate::tracing::{init as init_tracing, init_with_level};
