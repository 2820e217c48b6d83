//! Definition of the data formats coming from the ADS-B receiver.
//!
//! The only input format at the moment is the `aircraft.json` snapshot
//! served by tar1090/readsb-style receivers.  `tar1090` defines the raw
//! schema and the cooked `Aircraft` record, `squawk` the transponder code
//! catalog and classification.
//!

// Re-export for convenience
//
pub use squawk::*;
pub use tar1090::*;

mod squawk;
mod tar1090;

pub fn version() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}
