//! Timezone name resolution.

use chrono_tz::Tz;

use crate::errors::{Error, Result};

/// Resolve a user-supplied timezone name to a concrete zone.
///
/// An empty name or `"Local"` means the system zone. Any other name is
/// looked up in the bundled IANA database; unknown names are an error,
/// never a silent fallback to local or UTC.
pub fn resolve(name: &str) -> Result<Tz> {
    match name {
        "" | "Local" => Ok(system_timezone()),
        _ => name.parse().map_err(|_| Error::InvalidTimezone {
            name: name.to_string(),
        }),
    }
}

/// Best-effort system zone discovery.
///
/// `iana_time_zone::get_timezone` does not consult the `TZ` variable, so
/// check that first. UTC is the last resort when the platform reports
/// nothing usable.
fn system_timezone() -> Tz {
    if let Ok(name) = std::env::var("TZ") {
        if let Ok(tz) = name.parse() {
            return tz;
        }
    }
    iana_time_zone::get_timezone()
        .ok()
        .and_then(|name| name.parse().ok())
        .unwrap_or(Tz::UTC)
}
