//! Flight registry and derived metrics.
//!
//! `registry` keeps the set of currently monitored flights, rebuilt from
//! each accepted snapshot.  `metrics` turns a registry plus the receiver
//! location into the values the monitoring side displays.
//!

pub use error::*;
pub use metrics::*;
pub use registry::*;

mod error;
mod metrics;
mod registry;

pub fn version() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
