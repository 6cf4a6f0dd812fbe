//! Decoding of TZif files into transition and offset columns.
//!
//! `TZif` stands for Time zone information format and is laid out by
//! [RFC 8536][rfc8536]. Parsing is done by the `tzif` [rust crate][tzif-crate];
//! this module flattens the parsed data blocks into one offset per
//! transition and unrolls the POSIX TZ footer for slim files.
//!
//! [rfc8536]: https://datatracker.ietf.org/doc/html/rfc8536
//! [tzif-crate]: https://docs.rs/tzif/latest/tzif/

use combine::Parser;
use tzif::data::{
    posix::PosixTzString,
    tzif::{DataBlock, TzifData},
};

use crate::{
    bundled, posix,
    provider::{DecodeResult, RawTransitions, TransitionDecoder, ZoneSource},
    utils, DecodeError, MIN_TRANSITION_TIME,
};

/// Year the footer rule is unrolled from when a file lists no transitions.
const RULE_ONLY_FIRST_YEAR: i32 = 1970;

/// A `TransitionDecoder` for TZif v1, v2 and v3 data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TzifDecoder {
    expansion_years: i32,
}

impl Default for TzifDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl TzifDecoder {
    pub const fn new() -> Self {
        Self {
            expansion_years: posix::RULE_EXPANSION_YEARS,
        }
    }

    /// Sets how many years past the last listed transition the footer
    /// rule is unrolled for, at most [`MAX_RULE_EXPANSION_YEARS`].
    ///
    /// [`MAX_RULE_EXPANSION_YEARS`]: crate::MAX_RULE_EXPANSION_YEARS
    pub const fn with_expansion_years(mut self, years: i32) -> Self {
        self.expansion_years = if years < 0 {
            0
        } else if years > posix::MAX_RULE_EXPANSION_YEARS {
            posix::MAX_RULE_EXPANSION_YEARS
        } else {
            years
        };
        self
    }

    pub const fn expansion_years(&self) -> i32 {
        self.expansion_years
    }

    /// Room for two rule transitions per unrolled year.
    fn rule_capacity(&self) -> usize {
        2 * (self.expansion_years.unsigned_abs() as usize + 1)
    }

    /// Decodes raw TZif bytes.
    pub fn decode_bytes(&self, data: &[u8]) -> DecodeResult<RawTransitions> {
        let Ok((parse_result, _)) = tzif::parse::tzif::tzif().parse(data) else {
            return Err(DecodeError::Malformed("unable to parse TZif data"));
        };
        let TzifData {
            data_block1,
            data_block2,
            footer,
            ..
        } = parse_result;
        // v1 data blocks only cover 32 bit timestamps. Prefer the v2+ block.
        let block = data_block2.unwrap_or(data_block1);
        self.transitions_for_block(&block, footer.as_ref())
    }

    fn transitions_for_block(
        &self,
        db: &DataBlock,
        footer: Option<&PosixTzString>,
    ) -> DecodeResult<RawTransitions> {
        // <https://datatracker.ietf.org/doc/html/rfc8536#section-3.2>
        // Local time for timestamps before the first transition is
        // specified by time type 0.
        let initial_offset = db
            .local_time_type_records
            .first()
            .ok_or(DecodeError::Malformed("missing local time type records"))?
            .utoff
            .0;

        let Some(last_transition) = db.transition_times.last() else {
            return Ok(self.transitions_without_listed(initial_offset, footer));
        };

        let mut transitions =
            RawTransitions::with_capacity(db.transition_times.len() + 1 + self.rule_capacity());
        transitions.push(MIN_TRANSITION_TIME, initial_offset);

        for (idx, transition_time) in db.transition_times.iter().enumerate() {
            // NOTE: Transition type can be empty. If no transition_type exists,
            // then use 0 as the default index of local_time_type_records.
            let record_idx = db.transition_types.get(idx).copied().unwrap_or(0);
            let record = db
                .local_time_type_records
                .get(record_idx)
                .ok_or(DecodeError::Malformed("transition type out of range"))?;
            transitions.push(transition_time.0, record.utoff.0);
        }

        if let Some(footer) = footer {
            let first_year = utils::year_from_epoch_seconds(last_transition.0);
            posix::expand_rule(
                footer,
                first_year,
                self.expansion_years,
                last_transition.0,
                &mut transitions,
            );
        }

        Ok(transitions)
    }

    /// Transitions for a file listing none; for fixed offset zones or
    /// zones described entirely by their footer rule.
    fn transitions_without_listed(
        &self,
        initial_offset: i64,
        footer: Option<&PosixTzString>,
    ) -> RawTransitions {
        let offset = footer.map_or(initial_offset, posix::std_offset);
        match footer {
            Some(footer) if posix::has_dst_rule(footer) => {
                let mut transitions = RawTransitions::with_capacity(1 + self.rule_capacity());
                transitions.push(MIN_TRANSITION_TIME, offset);
                posix::expand_rule(
                    footer,
                    RULE_ONLY_FIRST_YEAR,
                    self.expansion_years,
                    MIN_TRANSITION_TIME,
                    &mut transitions,
                );
                transitions
            }
            // UTC-like zones stay empty.
            _ if offset == 0 => RawTransitions::default(),
            _ => {
                let mut transitions = RawTransitions::with_capacity(1);
                transitions.push(MIN_TRANSITION_TIME, offset);
                transitions
            }
        }
    }
}

impl TransitionDecoder for TzifDecoder {
    fn decode(&self, source: &ZoneSource, zone_name: &str) -> DecodeResult<RawTransitions> {
        match source {
            ZoneSource::Directory(dir) => {
                let data = std::fs::read(dir.join(zone_name))?;
                self.decode_bytes(&data)
            }
            ZoneSource::Bundled => {
                let data = bundled::get(zone_name).ok_or(DecodeError::NotFound)?;
                self.decode_bytes(data)
            }
        }
    }
}
