//! The bundled copy of the IANA time zone database.
//!
//! Backed by `jiff-tzdb` when the `bundled` feature is enabled. Lookups
//! are exact: a name only matches an entry spelled the same way.

/// Returns whether bundled data was compiled in.
pub const fn is_available() -> bool {
    cfg!(feature = "bundled")
}

/// Returns the TZif bytes of the bundled entry named exactly `zone_name`.
#[cfg(feature = "bundled")]
pub fn get(zone_name: &str) -> Option<&'static [u8]> {
    // `jiff_tzdb::get` matches case insensitively and hands back the
    // stored spelling, which must be the query itself.
    let (stored_name, data) = jiff_tzdb::get(zone_name)?;
    (stored_name == zone_name).then_some(data)
}

#[cfg(not(feature = "bundled"))]
pub fn get(_zone_name: &str) -> Option<&'static [u8]> {
    None
}
