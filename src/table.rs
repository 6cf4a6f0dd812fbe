//! The `TransitionTable` handed to conversion code.

use zone_transitions_provider::{RawTransitions, MIN_TRANSITION_TIME};

/// Column name of the transition instants.
pub const TRANSITION_TIMES_COLUMN: &str = "transition_times";
/// Column name of the UTC offsets.
pub const OFFSETS_COLUMN: &str = "offsets";

/// The UTC offset change points of a single zone.
///
/// `offsets[i]` is the UTC offset, in seconds, in effect at and after
/// `transition_times[i]`, in seconds since the Unix epoch. Both columns
/// always have the same, non-zero length and the transition times are
/// strictly ascending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    transition_times: Vec<i64>,
    offsets: Vec<i64>,
}

impl TransitionTable {
    /// The table used for zones that never leave UTC: one transition at
    /// the start of representable time with a zero offset.
    pub fn degenerate() -> Self {
        Self {
            transition_times: vec![MIN_TRANSITION_TIME],
            offsets: vec![0],
        }
    }

    /// Builds a table from decoded transitions.
    ///
    /// Returns [`TransitionTable::degenerate`] for empty input. Non-empty
    /// input is taken as is; ordering and length are the decoder's
    /// responsibility.
    pub fn from_raw(raw: RawTransitions) -> Self {
        if raw.is_empty() {
            return Self::degenerate();
        }
        let (transition_times, offsets) = raw.into_parts();
        debug_assert_eq!(transition_times.len(), offsets.len());
        Self {
            transition_times,
            offsets,
        }
    }

    pub fn transition_times(&self) -> &[i64] {
        &self.transition_times
    }

    pub fn offsets(&self) -> &[i64] {
        &self.offsets
    }

    /// Number of transitions in the table.
    pub fn len(&self) -> usize {
        self.transition_times.len()
    }

    /// A well formed table is never empty.
    pub fn is_empty(&self) -> bool {
        self.transition_times.is_empty()
    }

    /// Returns whether this is the single entry table of a UTC-like zone.
    pub fn is_degenerate(&self) -> bool {
        self.transition_times == [MIN_TRANSITION_TIME] && self.offsets == [0]
    }

    /// The table as named columns, in the order a tabular container
    /// expects them.
    pub fn columns(&self) -> [(&'static str, &[i64]); 2] {
        [
            (TRANSITION_TIMES_COLUMN, self.transition_times.as_slice()),
            (OFFSETS_COLUMN, self.offsets.as_slice()),
        ]
    }

    /// Iterates `(transition_time, offset)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (i64, i64)> + '_ {
        self.transition_times
            .iter()
            .copied()
            .zip(self.offsets.iter().copied())
    }

    pub fn into_columns(self) -> (Vec<i64>, Vec<i64>) {
        (self.transition_times, self.offsets)
    }
}
