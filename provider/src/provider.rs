//! The `TransitionDecoder` trait and the data it exchanges.

use std::path::{Path, PathBuf};

use crate::DecodeError;

pub(crate) type DecodeResult<T> = Result<T, DecodeError>;

/// Where the raw TZif data for a zone lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ZoneSource {
    /// A zoneinfo directory that holds a file named after the zone.
    Directory(PathBuf),
    /// The compiled copy of the IANA database shipped with this crate.
    ///
    /// This behaves like a virtual zoneinfo directory.
    Bundled,
}

impl ZoneSource {
    /// Returns the directory of a file system source.
    pub fn directory(&self) -> Option<&Path> {
        match self {
            Self::Directory(dir) => Some(dir),
            Self::Bundled => None,
        }
    }

    pub fn is_bundled(&self) -> bool {
        matches!(self, Self::Bundled)
    }
}

impl core::fmt::Display for ZoneSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Directory(dir) => write!(f, "{}", dir.display()),
            Self::Bundled => f.write_str("<bundled>"),
        }
    }
}

/// The decoded transitions of a zone, as two parallel columns.
///
/// `offsets[i]` is the UTC offset in seconds in effect at and after
/// `transition_times[i]` (seconds since the Unix epoch). Both columns are
/// empty for zones that never leave UTC.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTransitions {
    pub transition_times: Vec<i64>,
    pub offsets: Vec<i64>,
}

impl RawTransitions {
    pub fn is_empty(&self) -> bool {
        self.transition_times.is_empty() && self.offsets.is_empty()
    }

    pub fn len(&self) -> usize {
        self.transition_times.len()
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            transition_times: Vec::with_capacity(capacity),
            offsets: Vec::with_capacity(capacity),
        }
    }

    /// Appends a transition.
    ///
    /// A transition earlier than the last one is ignored, one at the same
    /// instant supersedes it, and one that keeps the current offset is
    /// dropped, so the columns stay strictly ascending.
    pub(crate) fn push(&mut self, time: i64, offset: i64) {
        match self.transition_times.last() {
            Some(&last) if time < last => return,
            Some(&last) if time == last => {
                self.transition_times.pop();
                self.offsets.pop();
            }
            _ => {}
        }
        if self.offsets.last() == Some(&offset) {
            return;
        }
        self.transition_times.push(time);
        self.offsets.push(offset);
    }

    pub fn into_parts(self) -> (Vec<i64>, Vec<i64>) {
        (self.transition_times, self.offsets)
    }
}

/// The `TransitionDecoder` trait turns a zone's raw data into
/// transition and offset columns.
pub trait TransitionDecoder {
    fn decode(&self, source: &ZoneSource, zone_name: &str) -> DecodeResult<RawTransitions>;
}

impl<D: TransitionDecoder + ?Sized> TransitionDecoder for &D {
    fn decode(&self, source: &ZoneSource, zone_name: &str) -> DecodeResult<RawTransitions> {
        (**self).decode(source, zone_name)
    }
}
