//! The `zone_transitions` crate resolves, loads and caches the UTC offset
//! transitions of IANA time zones.
//!
//! A zone's transitions are read from the first zoneinfo directory on a
//! [`SearchPath`] holding it, or from the bundled time zone database when
//! no directory does. Tables are kept in a bounded
//! [`TransitionCache`], so converting many timestamps in one zone decodes
//! that zone once.
//!
//! ```rust
//! use zone_transitions::{SearchPath, TransitionCache, ZoneLocator};
//!
//! let cache = TransitionCache::new(ZoneLocator::new(SearchPath::empty()));
//!
//! let table = cache.get_or_load("America/New_York").unwrap();
//! assert!(table.transition_times().is_sorted());
//! assert_eq!(table.transition_times().len(), table.offsets().len());
//!
//! // Zones without transitions get a single zero offset entry.
//! let utc = cache.get_or_load("UTC").unwrap();
//! assert_eq!(utc.transition_times(), &[i64::MIN + 1]);
//! assert_eq!(utc.offsets(), &[0]);
//! ```
#![cfg_attr(not(test), forbid(clippy::unwrap_used))]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::must_use_candidate
)]

#[macro_use]
mod logging;

pub mod cache;
pub mod error;
pub mod locator;
pub mod options;
pub mod reader;
pub mod table;

#[doc(inline)]
pub use cache::{TransitionCache, DEFAULT_CACHE_CAPACITY};
#[doc(inline)]
pub use error::{ErrorKind, FallbackFailure, TransitionError};
#[doc(inline)]
pub use locator::{SearchPath, ZoneLocator, DEFAULT_SEARCH_DIRECTORIES, TZDIR_ENV_VAR};
#[doc(inline)]
pub use options::{
    validate_local_time_policy, validate_policies, AmbiguousTimePolicy, NonexistentTimePolicy,
};
#[doc(inline)]
pub use reader::TransitionTableReader;
#[doc(inline)]
pub use table::{TransitionTable, OFFSETS_COLUMN, TRANSITION_TIMES_COLUMN};

pub use zone_transitions_provider::{
    DecodeError, RawTransitions, TransitionDecoder, TzifDecoder, ZoneSource, MIN_TRANSITION_TIME,
};

/// The `Result` type of this crate.
pub type TransitionResult<T> = Result<T, TransitionError>;

/// Returns the transition table of `zone_name` from the process wide
/// [`TransitionCache`].
///
/// The cache searches `$TZDIR`, then the default zoneinfo directories,
/// then the bundled database.
#[cfg(feature = "sys")]
#[inline]
pub fn get_tz_data(zone_name: &str) -> TransitionResult<std::sync::Arc<TransitionTable>> {
    TransitionCache::global().get_or_load(zone_name)
}
