use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;

static VERSION_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.].*").expect("version suffix pattern"));

/// Human-readable rendering of an elapsed duration.
///
/// Sub-millisecond durations render in microseconds, sub-second in
/// milliseconds, everything else in fractional seconds.
#[must_use]
pub fn format_duration(elapsed: Duration) -> String {
    if elapsed < Duration::from_millis(1) {
        format!("{}\u{b5}s", elapsed.as_micros())
    } else if elapsed < Duration::from_secs(1) {
        format!("{:.3}ms", elapsed.as_secs_f64() * 1_000.0)
    } else {
        format!("{:.3}s", elapsed.as_secs_f64())
    }
}

/// Strip everything after the numeric prefix of a server version string.
#[must_use]
pub(crate) fn clean_version(raw: &str) -> String {
    VERSION_SUFFIX.replace(raw, "").into_owned()
}
