//! The set of currently monitored flights.
//!

use std::collections::BTreeMap;

use tracing::trace;

use tarmon_formats::{Aircraft, Snapshot};

use crate::EngineError;

/// Holds every identified flight from the last accepted snapshot, keyed by
/// callsign.
///
/// A refresh replaces the whole set: records are never patched in place and
/// nothing carries over from one snapshot into the next.
///
#[derive(Clone, Debug, Default)]
pub struct FlightRegistry {
    /// Flights from the last accepted snapshot
    flights: BTreeMap<String, Aircraft>,
    /// Messages processed by the receiver, as reported by the feed
    messages: u64,
}

impl FlightRegistry {
    /// Empty registry, nothing monitored yet.
    ///
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry built from an initial snapshot.
    ///
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self, EngineError> {
        let mut registry = Self::new();
        registry.refresh(snapshot)?;
        Ok(registry)
    }

    /// Replace the registry content from a new snapshot.
    ///
    /// All-or-nothing: a snapshot without a usable aircraft list is rejected
    /// with `FeedMalformed` and the previous content stays queryable.  A
    /// healthy receiver always reports something (ground clutter, itself),
    /// an empty list means the feed is broken, not that the sky is empty.
    ///
    /// Entries without a callsign are skipped.  Duplicate callsigns keep
    /// the last entry in snapshot order.
    ///
    #[tracing::instrument(skip(self, snapshot))]
    pub fn refresh(&mut self, snapshot: &Snapshot) -> Result<(), EngineError> {
        let entries = match snapshot.aircraft.as_deref() {
            Some(list) if !list.is_empty() => list,
            _ => return Err(EngineError::FeedMalformed),
        };

        let mut next = BTreeMap::new();
        for raw in entries {
            let aircraft = Aircraft::from(raw);
            if let Some(callsign) = &aircraft.callsign {
                next.insert(callsign.to_owned(), aircraft);
            }
        }
        trace!("{} flights monitored", next.len());

        self.flights = next;
        self.messages = snapshot.messages;
        Ok(())
    }

    /// Look up a flight by callsign.
    ///
    pub fn get(&self, callsign: &str) -> Option<&Aircraft> {
        self.flights.get(callsign)
    }

    /// Iterate over the current records.  Order is stable within one
    /// snapshot, nothing is promised across snapshots.
    ///
    pub fn iter(&self) -> impl Iterator<Item = &Aircraft> {
        self.flights.values()
    }

    /// Evict one flight.  Not used by `refresh`, which always rebuilds.
    ///
    pub fn remove(&mut self, callsign: &str) -> Option<Aircraft> {
        self.flights.remove(callsign)
    }

    /// Amount of flights currently monitored.
    ///
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }

    /// Messages processed by the receiver since its own start.
    ///
    pub fn messages(&self) -> u64 {
        self.messages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(input: &str) -> Snapshot {
        Snapshot::from_json(input).unwrap()
    }

    #[test]
    fn test_refresh_builds_registry() {
        let snap = snapshot(
            r#"{ "messages": 42, "aircraft": [
                { "flight": "AFR564 " }, { "flight": "BAW123" } ] }"#,
        );
        let registry = FlightRegistry::from_snapshot(&snap).unwrap();

        assert_eq!(2, registry.len());
        assert_eq!(42, registry.messages());
        assert!(registry.get("AFR564").is_some());
        assert!(registry.get("BAW123").is_some());
    }

    #[test]
    fn test_refresh_skips_unidentified_entries() {
        let snap = snapshot(
            r#"{ "aircraft": [
                { "flight": "AFR564" }, { "flight": "   " }, { "squawk": "7700" } ] }"#,
        );
        let registry = FlightRegistry::from_snapshot(&snap).unwrap();

        assert_eq!(1, registry.len());
        assert_eq!(1, registry.iter().count());
    }

    #[test]
    fn test_refresh_last_write_wins() {
        let snap = snapshot(
            r#"{ "aircraft": [
                { "flight": "AFR564", "alt_geom": 1000 },
                { "flight": "AFR564", "alt_geom": 2000 } ] }"#,
        );
        let registry = FlightRegistry::from_snapshot(&snap).unwrap();

        assert_eq!(1, registry.len());
        assert_eq!(Some(2000.), registry.get("AFR564").unwrap().altitude);
    }

    #[test]
    fn test_refresh_rejects_empty_list_and_keeps_state() {
        let mut registry = FlightRegistry::from_snapshot(&snapshot(
            r#"{ "messages": 42, "aircraft": [ { "flight": "AFR564" } ] }"#,
        ))
        .unwrap();

        let res = registry.refresh(&snapshot(r#"{ "messages": 43, "aircraft": [] }"#));
        assert!(matches!(res, Err(EngineError::FeedMalformed)));

        // prior state untouched
        assert_eq!(1, registry.len());
        assert_eq!(42, registry.messages());
        assert!(registry.get("AFR564").is_some());
    }

    #[test]
    fn test_refresh_rejects_missing_list() {
        let mut registry = FlightRegistry::new();

        let res = registry.refresh(&snapshot(r#"{ "messages": 42 }"#));
        assert!(matches!(res, Err(EngineError::FeedMalformed)));
        assert!(registry.is_empty());
        assert_eq!(0, registry.messages());
    }

    #[test]
    fn test_remove_evicts_one_flight() {
        let mut registry = FlightRegistry::from_snapshot(&snapshot(
            r#"{ "aircraft": [ { "flight": "AFR564" } ] }"#,
        ))
        .unwrap();

        assert!(registry.remove("AFR564").is_some());
        assert!(registry.remove("AFR564").is_none());
        assert!(registry.is_empty());
    }
}
