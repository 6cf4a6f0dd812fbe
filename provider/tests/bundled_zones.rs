#![cfg(feature = "bundled")]

use jiff::{tz::TimeZone, Timestamp};
use zone_transitions_provider::{RawTransitions, TransitionDecoder, TzifDecoder, ZoneSource};

// 1850-01-01T00:00:00Z through 2300-01-01T00:00:00Z.
const FIRST_SECOND: i64 = -3_786_825_600;
const LAST_SECOND: i64 = 10_413_792_000;
// A little over five days, so samples drift across times of day.
const STEP: i64 = 5 * 86_400 + 3_613;

fn offset_at(transitions: &RawTransitions, seconds: i64) -> i64 {
    let idx = transitions
        .transition_times
        .partition_point(|&t| t <= seconds);
    if idx == 0 {
        return 0;
    }
    transitions.offsets[idx - 1]
}

fn mismatches(zone_name: &str, data: &[u8]) -> Vec<String> {
    let expected = TimeZone::tzif(zone_name, data).unwrap();
    let transitions = TzifDecoder::default()
        .decode(&ZoneSource::Bundled, zone_name)
        .unwrap();

    let mut found = Vec::new();
    let mut seconds = FIRST_SECOND;
    while seconds < LAST_SECOND {
        let timestamp = Timestamp::from_second(seconds).unwrap();
        let want = i64::from(expected.to_offset(timestamp).seconds());
        let got = offset_at(&transitions, seconds);
        if want != got {
            found.push(format!("{zone_name} at {seconds}: expected {want}, got {got}"));
            break;
        }
        seconds += STEP;
    }
    found
}

#[test]
fn every_bundled_zone_matches_jiff() {
    let mut failures = Vec::new();
    for zone_name in jiff_tzdb::available() {
        let (_, data) = jiff_tzdb::get(zone_name).unwrap();
        failures.extend(mismatches(zone_name, data));
    }
    assert!(failures.is_empty(), "{}", failures.join("\n"));
}

#[test]
fn every_bundled_zone_is_well_formed() {
    for zone_name in jiff_tzdb::available() {
        let transitions = TzifDecoder::default()
            .decode(&ZoneSource::Bundled, zone_name)
            .unwrap();
        assert_eq!(
            transitions.transition_times.len(),
            transitions.offsets.len(),
            "{zone_name}"
        );
        assert!(
            transitions
                .transition_times
                .windows(2)
                .all(|pair| pair[0] < pair[1]),
            "{zone_name}"
        );
    }
}
