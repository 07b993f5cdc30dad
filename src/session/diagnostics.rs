//! Per-session diagnostics: counters, the saved-query log, and timers.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::session::Session;
use crate::util::format_duration;

/// One diagnostic log entry for an executed statement.
///
/// Collected only while saved-query collection is enabled; appended, never
/// mutated; cleared by [`Session::flush`].
#[derive(Debug, Clone, Serialize)]
pub struct SavedQuery {
    /// The statement text, post-normalization.
    pub statement: String,
    /// Wall-clock execution time.
    pub elapsed: Duration,
    /// Call-site context: "file …, line …".
    pub caller: String,
}

impl SavedQuery {
    /// The elapsed time in the session's human-readable format.
    #[must_use]
    pub fn elapsed_text(&self) -> String {
        format_duration(self.elapsed)
    }
}

impl Session {
    /// Toggle per-statement [`SavedQuery`] collection.
    pub fn set_save_queries(&mut self, save_queries: bool) {
        self.save_queries = save_queries;
    }

    /// The saved-query log collected so far.
    #[must_use]
    pub fn saved_queries(&self) -> &[SavedQuery] {
        &self.saved_queries
    }

    /// Reset diagnostics: last error, affected-row count, executed-query
    /// counter, last-query marker, and the saved-query log.
    pub fn flush(&mut self) {
        self.last_error.clear();
        self.affected_rows = 0;
        self.queries_executed = 0;
        self.last_query = None;
        self.saved_queries.clear();
    }

    /// Start the diagnostic timer.
    pub fn timer_start(&mut self) {
        self.time_start = Some(Instant::now());
    }

    /// Stop the diagnostic timer and return the formatted elapsed time
    /// since the last [`Session::timer_start`]. Stopping without a prior
    /// start reports a zero duration.
    pub fn timer_stop(&mut self) -> String {
        let stop = Instant::now();
        self.time_stop = Some(stop);
        let elapsed = self
            .time_start
            .map(|start| stop.duration_since(start))
            .unwrap_or_default();
        format_duration(elapsed)
    }

    /// Elapsed time of the most recent timed statement, when one ran.
    #[must_use]
    pub fn last_query_elapsed_time(&self) -> Option<String> {
        self.last_elapsed().map(format_duration)
    }

    pub(crate) fn last_elapsed(&self) -> Option<Duration> {
        match (self.time_start, self.time_stop) {
            (Some(start), Some(stop)) => Some(stop.duration_since(start)),
            _ => None,
        }
    }
}
