//! Receiver configuration, loaded from an HCL file.
//!
//! The file carries the endpoint identity plus the knobs the original
//! integration exposes: polling interval, distance threshold and the two
//! squawk sets.  A compiled-in default is used when no file is given.
//!

use std::fs;
use std::path::Path;

use eyre::{eyre, Result};
use serde::Deserialize;
use tracing::trace;

use tarmon_common::Location;
use tarmon_formats::{DEFAULT_EMERGENCY_SQUAWK, DEFAULT_SPECIAL_SQUAWK};

/// Current receiver file version
const RECEIVER_FILE_VER: usize = 1;

/// Default polling interval in seconds
const DEFAULT_UPDATE_INTERVAL: u64 = 60;
/// Default distance threshold in km
const DEFAULT_DISTANCE_THRESHOLD: f64 = 10.;

/// On-disk description of the receiver endpoint.
///
#[derive(Debug, Deserialize)]
pub struct Receiver {
    /// Version number for safety
    pub version: usize,
    /// URL of the `aircraft.json` endpoint
    pub url: String,
    /// Polling interval in seconds
    #[serde(default = "default_interval")]
    pub update_interval: u64,
    /// Flag the nearest flight when closer than this many km
    #[serde(default = "default_threshold")]
    pub distance_threshold: f64,
    /// Squawk codes counted as emergencies
    #[serde(default = "default_emergency")]
    pub emergency_squawk: Vec<u32>,
    /// Squawk codes counted as special use
    #[serde(default = "default_special")]
    pub special_squawk: Vec<u32>,
    /// Receiver location, needed for the distance metrics
    pub home: Option<Location>,
}

fn default_interval() -> u64 {
    DEFAULT_UPDATE_INTERVAL
}

fn default_threshold() -> f64 {
    DEFAULT_DISTANCE_THRESHOLD
}

fn default_emergency() -> Vec<u32> {
    DEFAULT_EMERGENCY_SQUAWK.to_vec()
}

fn default_special() -> Vec<u32> {
    DEFAULT_SPECIAL_SQUAWK.to_vec()
}

impl Receiver {
    /// Load the receiver description.
    ///
    /// Reads the given file, or the compiled-in default when none is
    /// specified.
    ///
    #[tracing::instrument]
    pub fn load(fname: Option<&Path>) -> Result<Self> {
        trace!("enter");

        // Load from file if specified
        //
        let data = if let Some(fname) = fname {
            fs::read_to_string(fname)?
        } else {
            include_str!("receiver.hcl").to_owned()
        };

        let rcv: Receiver = hcl::from_str(&data)?;
        if rcv.version != RECEIVER_FILE_VER {
            return Err(eyre!("Bad receiver file version, aborting…"));
        }
        Ok(rcv)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_compiled_in_default() -> Result<()> {
        let rcv = Receiver::load(None)?;

        assert_eq!(RECEIVER_FILE_VER, rcv.version);
        assert_eq!(
            "http://adsbexchange.local/tar1090/data/aircraft.json",
            rcv.url
        );
        assert_eq!(60, rcv.update_interval);
        assert_eq!(10., rcv.distance_threshold);
        assert_eq!(vec![7500, 7600, 7700], rcv.emergency_squawk);
        assert_eq!(vec![7100], rcv.special_squawk);
        assert!(rcv.home.is_none());
        Ok(())
    }

    #[test]
    fn test_load_fills_in_defaults() -> Result<()> {
        let p = std::env::temp_dir().join("tarmon-minimal.hcl");
        fs::write(&p, "version = 1\nurl = \"http://10.0.0.2/data/aircraft.json\"\n")?;

        let rcv = Receiver::load(Some(&p))?;
        assert_eq!(60, rcv.update_interval);
        assert_eq!(vec![7500, 7600, 7700], rcv.emergency_squawk);
        Ok(())
    }

    #[test]
    fn test_load_rejects_bad_version() -> Result<()> {
        let p = std::env::temp_dir().join("tarmon-bad-version.hcl");
        fs::write(&p, "version = 2\nurl = \"http://10.0.0.2/data/aircraft.json\"\n")?;

        assert!(Receiver::load(Some(&p)).is_err());
        Ok(())
    }

    #[test]
    fn test_load_missing_file() {
        assert!(Receiver::load(Some(Path::new("/nonexistent/receiver.hcl"))).is_err());
    }
}
