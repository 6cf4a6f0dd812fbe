//! Finding where a zone's TZif data lives.
//!
//! Zones are looked up on an ordered [`SearchPath`] of zoneinfo
//! directories first; the first directory holding a file named after the
//! zone wins. Zones found nowhere on the search path are looked up in the
//! bundled database.

use std::path::{Component, Path, PathBuf};

use zone_transitions_provider::{bundled, ZoneSource};

use crate::{FallbackFailure, TransitionError, TransitionResult};

/// Environment variable naming a zoneinfo directory searched before the
/// default directories.
pub const TZDIR_ENV_VAR: &str = "TZDIR";

/// Zoneinfo directories searched when the host does not configure any.
pub const DEFAULT_SEARCH_DIRECTORIES: [&str; 4] = [
    "/usr/share/zoneinfo",
    "/usr/lib/zoneinfo",
    "/usr/share/lib/zoneinfo",
    "/etc/zoneinfo",
];

/// An ordered list of absolute zoneinfo directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    directories: Vec<PathBuf>,
}

impl SearchPath {
    /// Creates a search path from directories in priority order.
    ///
    /// Relative directories are dropped, as are repeats of a directory
    /// already listed.
    pub fn new<I, P>(directories: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut search_path = Self::default();
        for dir in directories {
            search_path.push(dir.into());
        }
        search_path
    }

    /// A search path with no directories; only bundled data is used.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The default directories, without consulting the environment.
    pub fn system_default() -> Self {
        Self::new(DEFAULT_SEARCH_DIRECTORIES)
    }

    /// `$TZDIR` when set, followed by the default directories.
    pub fn from_env() -> Self {
        let mut search_path = Self::default();
        if let Some(tzdir) = std::env::var_os(TZDIR_ENV_VAR).filter(|dir| !dir.is_empty()) {
            debug!("searching {TZDIR_ENV_VAR}={tzdir:?} before default zoneinfo directories");
            search_path.push(PathBuf::from(tzdir));
        }
        for dir in DEFAULT_SEARCH_DIRECTORIES {
            search_path.push(PathBuf::from(dir));
        }
        search_path
    }

    fn push(&mut self, dir: PathBuf) {
        if !dir.is_absolute() {
            warn!(
                "ignoring relative zoneinfo directory {}, search directories must be absolute",
                dir.display()
            );
            return;
        }
        if !self.directories.contains(&dir) {
            self.directories.push(dir);
        }
    }

    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    pub fn is_empty(&self) -> bool {
        self.directories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.directories.iter().map(PathBuf::as_path)
    }
}

impl<P: Into<PathBuf>> FromIterator<P> for SearchPath {
    fn from_iter<T: IntoIterator<Item = P>>(iter: T) -> Self {
        Self::new(iter)
    }
}

/// Resolves zone names to the source their data is read from.
#[derive(Debug, Clone)]
pub struct ZoneLocator {
    search_path: SearchPath,
    fallback: bool,
}

impl Default for ZoneLocator {
    fn default() -> Self {
        Self::new(SearchPath::system_default())
    }
}

impl ZoneLocator {
    /// Creates a locator over `search_path` that falls back to the
    /// bundled database.
    pub fn new(search_path: SearchPath) -> Self {
        Self {
            search_path,
            fallback: true,
        }
    }

    /// Creates a locator that only consults `search_path`.
    pub fn without_fallback(search_path: SearchPath) -> Self {
        Self {
            search_path,
            fallback: false,
        }
    }

    pub fn search_path(&self) -> &SearchPath {
        &self.search_path
    }

    /// Returns whether zones missing from the search path may come from
    /// the bundled database.
    pub fn has_fallback(&self) -> bool {
        self.fallback && bundled::is_available()
    }

    /// Finds the source holding `zone_name`.
    ///
    /// Search directories are tried in order, then the bundled database.
    /// Every way the bundled lookup can fail is reported as
    /// [`ErrorKind::ZoneNotFound`](crate::ErrorKind::ZoneNotFound), with
    /// the [`FallbackFailure`] as its source.
    pub fn locate(&self, zone_name: &str) -> TransitionResult<ZoneSource> {
        if let Some(dir) = self.locate_on_search_path(zone_name) {
            trace!("found {zone_name} in {}", dir.display());
            return Ok(ZoneSource::Directory(dir.to_path_buf()));
        }
        match self.check_fallback(zone_name) {
            Ok(()) => {
                debug!("{zone_name} not on the search path, using bundled data");
                Ok(ZoneSource::Bundled)
            }
            Err(failure) => Err(zone_not_found(zone_name, failure)),
        }
    }

    /// Returns the first search directory with a file named `zone_name`.
    pub fn locate_on_search_path(&self, zone_name: &str) -> Option<&Path> {
        if !is_relative_key(zone_name) {
            return None;
        }
        self.search_path
            .iter()
            .find(|dir| dir.join(zone_name).is_file())
    }

    /// Checks that the bundled database has `zone_name`.
    ///
    /// Only the name is checked. [`ZoneSource::Bundled`] carries no data,
    /// so any [`TransitionDecoder`](zone_transitions_provider::TransitionDecoder)
    /// can read it, and the decoder looks the entry up again with the same
    /// exact-name [`bundled::get`]. That lookup is a search over static
    /// data and cannot disagree with this one.
    fn check_fallback(&self, zone_name: &str) -> Result<(), FallbackFailure> {
        if !self.has_fallback() {
            return Err(FallbackFailure::Unavailable);
        }
        if !is_resource_name(zone_name) {
            return Err(FallbackFailure::UnrepresentableName);
        }
        if bundled::get(zone_name).is_none() {
            return Err(FallbackFailure::MissingResource);
        }
        Ok(())
    }
}

pub(crate) fn zone_not_found(zone_name: &str, failure: FallbackFailure) -> TransitionError {
    TransitionError::zone_not_found()
        .with_message(format!("no time zone found with key {zone_name:?}"))
        .with_source(failure)
}

/// A zone name must stay inside the directory it is joined to.
fn is_relative_key(zone_name: &str) -> bool {
    !zone_name.is_empty()
        && Path::new(zone_name)
            .components()
            .all(|component| matches!(component, Component::Normal(_)))
}

/// Bundled entries are named with printable ASCII only.
fn is_resource_name(zone_name: &str) -> bool {
    !zone_name.is_empty() && zone_name.bytes().all(|b| b.is_ascii_graphic())
}
