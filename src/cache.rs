//! The `TransitionCache`, a bounded least recently used cache of
//! transition tables keyed by zone name.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use zone_transitions_provider::{TransitionDecoder, TzifDecoder, ZoneSource};

use crate::{
    locator::{self, ZoneLocator},
    reader::TransitionTableReader,
    FallbackFailure, TransitionError, TransitionResult, TransitionTable,
};

#[cfg(feature = "sys")]
use crate::locator::SearchPath;
#[cfg(feature = "sys")]
use std::sync::LazyLock;

/// Number of zones kept by default.
pub const DEFAULT_CACHE_CAPACITY: usize = 20;

// Ordered from least to most recently used.
type ZoneMap = IndexMap<String, Arc<TransitionTable>, FxBuildHasher>;

#[cfg(feature = "sys")]
static GLOBAL_CACHE: LazyLock<TransitionCache> = LazyLock::new(TransitionCache::from_env);

/// Memoizes resolved transition tables per zone name.
///
/// The cache holds at most `capacity` zones. Loading a zone into a full
/// cache evicts the least recently used one first. Failed lookups are
/// never cached, so a later call retries from scratch.
///
/// Lookups may come from any number of threads. Cache updates are
/// serialized; decoding happens outside the lock, so two threads missing
/// on the same zone may both decode it, and both get the table that was
/// stored first.
#[derive(Debug)]
pub struct TransitionCache<D = TzifDecoder> {
    locator: ZoneLocator,
    reader: TransitionTableReader<D>,
    capacity: usize,
    zones: Mutex<ZoneMap>,
}

impl TransitionCache {
    /// Creates a cache of [`DEFAULT_CACHE_CAPACITY`] zones.
    pub fn new(locator: ZoneLocator) -> Self {
        Self::with_capacity(locator, DEFAULT_CACHE_CAPACITY)
    }

    /// Creates a cache of `capacity` zones, at least one.
    pub fn with_capacity(locator: ZoneLocator, capacity: usize) -> Self {
        Self::with_parts(locator, TransitionTableReader::default(), capacity)
    }

    /// Creates a cache searching `$TZDIR` and the default zoneinfo
    /// directories.
    #[cfg(feature = "sys")]
    pub fn from_env() -> Self {
        Self::new(ZoneLocator::new(SearchPath::from_env()))
    }

    /// The process wide cache, created from the environment on first use.
    #[cfg(feature = "sys")]
    pub fn global() -> &'static Self {
        &GLOBAL_CACHE
    }
}

impl<D: TransitionDecoder> TransitionCache<D> {
    fn with_parts(locator: ZoneLocator, reader: TransitionTableReader<D>, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            locator,
            reader,
            capacity,
            zones: Mutex::new(ZoneMap::with_capacity_and_hasher(
                capacity,
                FxBuildHasher,
            )),
        }
    }

    /// Replaces the decoder, returning an empty cache with the same
    /// locator and capacity.
    pub fn with_decoder<E: TransitionDecoder>(self, decoder: E) -> TransitionCache<E> {
        TransitionCache::with_parts(
            self.locator,
            TransitionTableReader::new(decoder),
            self.capacity,
        )
    }

    pub fn locator(&self) -> &ZoneLocator {
        &self.locator
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns whether `zone_name` is cached, without counting as a use.
    pub fn contains(&self, zone_name: &str) -> bool {
        self.lock().contains_key(zone_name)
    }

    /// The cached zone names, least recently used first.
    pub fn cached_zones(&self) -> Vec<String> {
        self.lock().keys().cloned().collect()
    }

    /// Returns the transition table of `zone_name`, loading it on a miss.
    pub fn get_or_load(&self, zone_name: &str) -> TransitionResult<Arc<TransitionTable>> {
        if let Some(table) = touch(&mut self.lock(), zone_name) {
            trace!("transition cache hit for {zone_name}");
            return Ok(table);
        }

        debug!("transition cache miss for {zone_name}");
        let table = Arc::new(self.load(zone_name)?);

        let mut zones = self.lock();
        // Another caller may have stored this zone while we were decoding.
        if let Some(existing) = touch(&mut zones, zone_name) {
            return Ok(existing);
        }
        if zones.len() >= self.capacity {
            let _evicted = zones.shift_remove_index(0);
            debug!(
                "evicted {:?} from the transition cache",
                _evicted.as_ref().map(|(name, _)| name)
            );
        }
        zones.insert(zone_name.to_owned(), Arc::clone(&table));
        Ok(table)
    }

    /// Locates and reads `zone_name`, bypassing the cache.
    pub fn load(&self, zone_name: &str) -> TransitionResult<TransitionTable> {
        let source = self.locator.locate(zone_name)?;
        let err = match self.reader.read(&source, zone_name) {
            Ok(table) => return Ok(table),
            Err(err) => err,
        };
        match source {
            // A bundled entry that cannot be read is as good as missing.
            ZoneSource::Bundled => Err(locator::zone_not_found(
                zone_name,
                FallbackFailure::Read(err),
            )),
            ZoneSource::Directory(dir) => {
                let msg = format!(
                    "unable to decode {zone_name:?} in {}: {err}",
                    dir.display()
                );
                Err(TransitionError::from(err).with_message(msg))
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, ZoneMap> {
        // The map stays structurally valid even if a holder panicked.
        self.zones.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Marks `zone_name` as most recently used and returns its table.
fn touch(zones: &mut ZoneMap, zone_name: &str) -> Option<Arc<TransitionTable>> {
    let idx = zones.get_index_of(zone_name)?;
    let last = zones.len() - 1;
    zones.move_index(idx, last);
    zones.get_index(last).map(|(_, table)| Arc::clone(table))
}

#[cfg(test)]
mod tests {
    use std::{
        error::Error,
        fs,
        path::Path,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc,
        },
    };

    use zone_transitions_provider::{DecodeError, RawTransitions, TransitionDecoder, ZoneSource};

    use super::{TransitionCache, DEFAULT_CACHE_CAPACITY};
    use crate::{ErrorKind, FallbackFailure, SearchPath, ZoneLocator};

    /// Hands out one transition per zone and counts decodes. Bundled
    /// entries and zones under `Broken/` fail to decode.
    #[derive(Default)]
    struct CountingDecoder {
        calls: AtomicUsize,
    }

    impl CountingDecoder {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl TransitionDecoder for CountingDecoder {
        fn decode(
            &self,
            source: &ZoneSource,
            zone_name: &str,
        ) -> Result<RawTransitions, DecodeError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if source.is_bundled() || zone_name.starts_with("Broken/") {
                return Err(DecodeError::Malformed("bad magic"));
            }
            Ok(RawTransitions {
                transition_times: vec![i64::MIN + 1, 0],
                offsets: vec![0, zone_name.len() as i64],
            })
        }
    }

    fn zone_dir(zones: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for zone in zones {
            add_zone(dir.path(), zone);
        }
        dir
    }

    fn add_zone(dir: &Path, zone_name: &str) {
        let path = dir.join(zone_name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"").unwrap();
    }

    fn zone_names(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("Test/Zone_{i}")).collect()
    }

    fn cache<'a>(
        dir: &Path,
        decoder: &'a CountingDecoder,
    ) -> TransitionCache<&'a CountingDecoder> {
        TransitionCache::new(ZoneLocator::without_fallback(SearchPath::new([dir]))).with_decoder(decoder)
    }

    #[test]
    fn hits_do_not_decode() {
        let dir = zone_dir(&["Test/Zone"]);
        let decoder = CountingDecoder::default();
        let cache = cache(dir.path(), &decoder);

        let first = cache.get_or_load("Test/Zone").unwrap();
        let second = cache.get_or_load("Test/Zone").unwrap();
        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(decoder.calls(), 1);
    }

    #[test]
    fn least_recently_used_is_evicted() {
        let names = zone_names(DEFAULT_CACHE_CAPACITY + 1);
        let dir = tempfile::tempdir().unwrap();
        names.iter().for_each(|name| add_zone(dir.path(), name));
        let decoder = CountingDecoder::default();
        let cache = cache(dir.path(), &decoder);

        let oldest = cache.get_or_load(&names[0]).unwrap();
        for name in &names[1..] {
            cache.get_or_load(name).unwrap();
        }
        assert_eq!(cache.len(), DEFAULT_CACHE_CAPACITY);
        assert!(!cache.contains(&names[0]));
        assert_eq!(decoder.calls(), DEFAULT_CACHE_CAPACITY + 1);

        // The other twenty are still served from the cache.
        for name in &names[1..] {
            cache.get_or_load(name).unwrap();
        }
        assert_eq!(decoder.calls(), DEFAULT_CACHE_CAPACITY + 1);

        // The evicted zone is resolved again, as a new table.
        let reloaded = cache.get_or_load(&names[0]).unwrap();
        assert_eq!(decoder.calls(), DEFAULT_CACHE_CAPACITY + 2);
        assert_eq!(oldest, reloaded);
        assert!(!Arc::ptr_eq(&oldest, &reloaded));
    }

    #[test]
    fn hits_refresh_recency() {
        let names = zone_names(3);
        let dir = tempfile::tempdir().unwrap();
        names.iter().for_each(|name| add_zone(dir.path(), name));
        let decoder = CountingDecoder::default();
        let cache = TransitionCache::with_capacity(
            ZoneLocator::without_fallback(SearchPath::new([dir.path()])),
            2,
        )
        .with_decoder(&decoder);

        cache.get_or_load(&names[0]).unwrap();
        cache.get_or_load(&names[1]).unwrap();
        cache.get_or_load(&names[0]).unwrap();
        cache.get_or_load(&names[2]).unwrap();

        assert_eq!(cache.cached_zones(), vec![names[0].clone(), names[2].clone()]);
    }

    #[test]
    fn failures_are_not_cached() {
        let dir = zone_dir(&[]);
        let decoder = CountingDecoder::default();
        let cache = cache(dir.path(), &decoder);

        let err = cache.get_or_load("Test/Late").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ZoneNotFound);
        assert!(cache.is_empty());

        add_zone(dir.path(), "Test/Late");
        assert!(cache.get_or_load("Test/Late").is_ok());
        assert!(cache.contains("Test/Late"));
    }

    #[test]
    fn decode_errors_from_directories() {
        let dir = zone_dir(&["Broken/Zone"]);
        let decoder = CountingDecoder::default();
        let cache = cache(dir.path(), &decoder);

        let err = cache.get_or_load("Broken/Zone").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Decode);
        assert!(err.message().contains("Broken/Zone"));
        assert!(!cache.contains("Broken/Zone"));

        // Not cached, so the decoder runs again.
        cache.get_or_load("Broken/Zone").unwrap_err();
        assert_eq!(decoder.calls(), 2);
    }

    #[test]
    fn unreadable_bundled_entries_are_not_found() {
        let decoder = CountingDecoder::default();
        let cache =
            TransitionCache::new(ZoneLocator::new(SearchPath::empty())).with_decoder(&decoder);

        let err = cache.get_or_load("America/New_York").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ZoneNotFound);
        let failure = err
            .source()
            .and_then(|source| source.downcast_ref::<FallbackFailure>());
        assert!(matches!(
            failure,
            Some(FallbackFailure::Read(DecodeError::Malformed("bad magic")))
        ));
        assert!(!cache.contains("America/New_York"));
        assert!(cache.is_empty());

        // Nothing was cached, so the entry is decoded again.
        cache.get_or_load("America/New_York").unwrap_err();
        assert_eq!(decoder.calls(), 2);
    }

    #[test]
    fn capacity_is_at_least_one() {
        let dir = zone_dir(&["Test/A", "Test/B"]);
        let decoder = CountingDecoder::default();
        let cache = TransitionCache::with_capacity(
            ZoneLocator::without_fallback(SearchPath::new([dir.path()])),
            0,
        )
        .with_decoder(&decoder);
        assert_eq!(cache.capacity(), 1);

        cache.get_or_load("Test/A").unwrap();
        cache.get_or_load("Test/B").unwrap();
        assert_eq!(cache.cached_zones(), vec!["Test/B".to_owned()]);
    }

    #[test]
    fn concurrent_lookups() {
        let names = zone_names(4);
        let dir = tempfile::tempdir().unwrap();
        names.iter().for_each(|name| add_zone(dir.path(), name));
        let decoder = CountingDecoder::default();
        let cache = cache(dir.path(), &decoder);

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for name in &names {
                        let table = cache.get_or_load(name).unwrap();
                        assert_eq!(table.offsets()[1], name.len() as i64);
                    }
                });
            }
        });

        assert_eq!(cache.len(), names.len());
        let first = cache.get_or_load(&names[0]).unwrap();
        let second = cache.get_or_load(&names[0]).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }
}
