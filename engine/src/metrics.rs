//! Derived metrics over the flight registry.
//!

use serde::Serialize;
use tracing::trace;

use tarmon_common::{distance_km, Location};
use tarmon_formats::{Aircraft, SquawkSet};

use crate::FlightRegistry;

/// The values handed to the monitoring side after each refresh cycle.
///
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Metrics {
    /// Messages processed by the receiver since its start
    pub message_count: u64,
    /// Flights currently monitored
    pub monitored_flights: usize,
    /// Flights with an emergency marker or an emergency squawk
    pub emergencies: usize,
    /// Flights squawking a special-use code
    pub specials: usize,
    /// Closest flight with a known position, needs the receiver location
    pub nearest_flight: Option<NearestFlight>,
}

/// The closest flight and what we know about it.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NearestFlight {
    /// Callsign
    pub callsign: String,
    /// Great-circle distance from the receiver in km
    pub distance_km: f64,
    /// Geometric altitude in feet
    pub altitude: Option<f64>,
    /// Speed as a Mach number
    pub mach: Option<f64>,
}

impl Metrics {
    /// Derive the metric values from the registry.
    ///
    /// Pure function of its inputs: same registry, same home, same sets,
    /// same bundle.  It never fails: a never-refreshed registry yields
    /// all-zero counts and no nearest flight, an absent home location only
    /// blanks the distance part.
    ///
    #[tracing::instrument(skip(registry, emergency, special))]
    pub fn compute(
        registry: &FlightRegistry,
        home: Option<Location>,
        emergency: &SquawkSet,
        special: &SquawkSet,
    ) -> Self {
        let mut metrics = Metrics {
            message_count: registry.messages(),
            monitored_flights: registry.len(),
            ..Metrics::default()
        };

        for aircraft in registry.iter() {
            if is_emergency(aircraft, emergency) {
                metrics.emergencies += 1;
            }
            if aircraft.squawk_code().is_some_and(|c| special.contains(c)) {
                metrics.specials += 1;
            }

            if let (Some(pos), Some(home)) = (aircraft.position, home) {
                let d = distance_km(Location::new(pos.latitude, pos.longitude), home);
                let closer = metrics
                    .nearest_flight
                    .as_ref()
                    .map_or(true, |n| d < n.distance_km);
                if closer {
                    metrics.nearest_flight = Some(NearestFlight {
                        callsign: aircraft.callsign.clone().unwrap_or_default(),
                        distance_km: d,
                        altitude: aircraft.altitude,
                        mach: aircraft.mach,
                    });
                }
            }
        }
        trace!(
            "{} flights, {} emergencies",
            metrics.monitored_flights,
            metrics.emergencies
        );

        metrics
    }
}

/// A flight counts as an emergency when the device marker says so or when
/// it squawks one of the configured emergency codes.  Both at once still
/// count once.
///
fn is_emergency(aircraft: &Aircraft, emergency: &SquawkSet) -> bool {
    aircraft.emergency || aircraft.squawk_code().is_some_and(|c| emergency.contains(c))
}
