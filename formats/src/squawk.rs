//! Transponder (squawk) code catalog and classification.
//!
//! A squawk is the 4-digit code an aircraft transponder broadcasts.  A few
//! codes have a published meaning and some of those denote an emergency on
//! board.  Which codes count as emergency or special use is configurable,
//! the compiled-in defaults match the usual 7500/7600/7700 set.
//!

use std::collections::BTreeSet;

use strum::EnumString;

/// Default emergency squawk codes
pub const DEFAULT_EMERGENCY_SQUAWK: [u32; 3] = [7500, 7600, 7700];
/// Default special-use squawk codes
pub const DEFAULT_SPECIAL_SQUAWK: [u32; 1] = [7100];

/// The well-known codes and their published meaning.
///
const CATALOG: &[(&str, &str)] = &[
    ("0033", "Parachute dropping in progress"),
    ("1200", "VFR flight (North America)"),
    ("2000", "Entering SSR airspace from a non-radar area"),
    ("7000", "VFR conspicuity (Europe)"),
    ("7004", "Aerobatic manoeuvres"),
    ("7010", "Aerodrome traffic pattern conspicuity (UK)"),
    ("7500", "Aircraft hijacking"),
    ("7600", "Radio failure"),
    ("7700", "General emergency"),
    ("7777", "Military interception"),
];

/// Look up the published meaning of a squawk code, if any.
///
#[inline]
pub fn describe(code: &str) -> Option<&'static str> {
    CATALOG
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, descr)| *descr)
}

/// The whole catalog, for display purposes.
///
#[inline]
pub fn catalog() -> &'static [(&'static str, &'static str)] {
    CATALOG
}

/// A normalized set of squawk codes, built from the numeric values found in
/// the configuration.  Codes are kept as zero-padded 4-digit strings since
/// that is how the feed transmits them.
///
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SquawkSet(BTreeSet<String>);

impl SquawkSet {
    pub fn new(codes: &[u32]) -> Self {
        Self(codes.iter().map(|c| format!("{c:04}")).collect())
    }

    /// Default emergency set, {7500, 7600, 7700}
    pub fn emergency_default() -> Self {
        Self::new(&DEFAULT_EMERGENCY_SQUAWK)
    }

    /// Default special set, {7100}
    pub fn special_default() -> Self {
        Self::new(&DEFAULT_SPECIAL_SQUAWK)
    }

    #[inline]
    pub fn contains(&self, code: &str) -> bool {
        self.0.contains(code.trim())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// How a given squawk code is to be treated.
///
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, strum::Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SquawkClass {
    Emergency,
    Special,
    #[default]
    Normal,
}

/// Classify a code against the configured sets.  Emergency wins when the
/// two sets overlap.
///
pub fn classify(code: &str, emergency: &SquawkSet, special: &SquawkSet) -> SquawkClass {
    if emergency.contains(code) {
        SquawkClass::Emergency
    } else if special.contains(code) {
        SquawkClass::Special
    } else {
        SquawkClass::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("7500", Some("Aircraft hijacking"))]
    #[case("7600", Some("Radio failure"))]
    #[case("7700", Some("General emergency"))]
    #[case("4215", None)]
    fn test_describe(#[case] code: &str, #[case] descr: Option<&'static str>) {
        assert_eq!(descr, describe(code));
    }

    #[test]
    fn test_squawk_set_is_zero_padded() {
        let set = SquawkSet::new(&[33, 7700]);

        assert!(set.contains("0033"));
        assert!(set.contains("7700"));
        assert!(!set.contains("33"));
    }

    #[test]
    fn test_squawk_set_defaults() {
        let set = SquawkSet::emergency_default();

        assert!(set.contains("7500"));
        assert!(set.contains("7600"));
        assert!(set.contains("7700"));
        assert!(!set.contains("1200"));

        assert!(SquawkSet::special_default().contains("7100"));
    }

    #[rstest]
    #[case("7700", SquawkClass::Emergency)]
    #[case("7100", SquawkClass::Special)]
    #[case("1200", SquawkClass::Normal)]
    fn test_classify_with_defaults(#[case] code: &str, #[case] class: SquawkClass) {
        let emergency = SquawkSet::emergency_default();
        let special = SquawkSet::special_default();

        assert_eq!(class, classify(code, &emergency, &special));
    }

    #[test]
    fn test_classify_emergency_wins_on_overlap() {
        let both = SquawkSet::new(&[7700]);

        assert_eq!(SquawkClass::Emergency, classify("7700", &both, &both));
    }

    #[test]
    fn test_squawk_class_display() {
        assert_eq!("emergency", SquawkClass::Emergency.to_string());
        assert_eq!("normal", SquawkClass::Normal.to_string());
    }
}
