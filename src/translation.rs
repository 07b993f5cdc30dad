use std::sync::LazyLock;

use regex::Regex;

/// The marker templates are written against before backend rewriting.
pub const CANONICAL_MARKER: &str = "%s";

static PERCENT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"%{2,}").expect("percent run pattern"));

/// Normalize a legacy sprintf-style SQL template into one that uses only
/// the backend's native bound-parameter marker.
///
/// Rules, applied in order over the whole string:
///
/// 1. `'%s'` is unquoted to the bare marker (a quoted marker would bind as
///    a literal string)
/// 2. `"%s"` is unquoted identically
/// 3. `%f` is rewritten to the bare marker
/// 4. `%d` is rewritten to the bare marker
/// 5. any run of two or more `%` characters collapses to a single `%`,
///    so an escaped `%%` in the template survives as a literal percent
/// 6. every remaining `%s` becomes the backend marker
///
/// Step 5 is lossy: a template cannot express a genuinely repeated run of
/// markers. Known limitation carried over from the source system.
///
/// Argument values are never touched here; binding and typing stay with
/// the backend.
#[must_use]
pub fn normalize_template(sql: &str, marker: &str) -> String {
    let unquoted = sql
        .replace("'%s'", CANONICAL_MARKER)
        .replace("\"%s\"", CANONICAL_MARKER)
        .replace("%f", CANONICAL_MARKER)
        .replace("%d", CANONICAL_MARKER);
    let collapsed = PERCENT_RUN.replace_all(&unquoted, "%");
    collapsed.replace(CANONICAL_MARKER, marker)
}
