//! Time zone transition data decoding
//!
//! This crate turns TZif files, either from a zoneinfo directory or from
//! the bundled IANA database, into two flat columns: the instants at which
//! a zone's UTC offset changes and the offset in effect from each of them.
//!
//! ```
//! use zone_transitions_provider::{TransitionDecoder, TzifDecoder, ZoneSource};
//!
//! # #[cfg(feature = "bundled")]
//! # {
//! let transitions = TzifDecoder::default()
//!     .decode(&ZoneSource::Bundled, "America/Chicago")
//!     .unwrap();
//! assert_eq!(transitions.transition_times.len(), transitions.offsets.len());
//! # }
//! ```

mod error;
mod posix;
mod provider;
mod tzif;
mod utils;

pub mod bundled;

pub use error::DecodeError;
pub use posix::{MAX_RULE_EXPANSION_YEARS, RULE_EXPANSION_YEARS};
pub use provider::{RawTransitions, TransitionDecoder, ZoneSource};
pub use tzif::TzifDecoder;

/// The earliest instant used in transition columns, one second after the
/// minimum representable `i64`.
///
/// It carries the offset in effect before a zone's first real transition.
pub const MIN_TRANSITION_TIME: i64 = i64::MIN + 1;
