//! Database query metrics.

use metrics::histogram;
use std::time::Instant;

/// Times a single repository query and records its duration under the
/// `database_query_duration_seconds` histogram, labeled by query name.
///
/// Usage:
/// ```ignore
/// let timer = QueryTimer::new("find_user_by_id");
/// let result = sqlx::query_as::<_, UserEntity>(...).fetch_optional(&pool).await;
/// timer.record();
/// result
/// ```
pub struct QueryTimer {
    query_name: &'static str,
    start: Instant,
}

impl QueryTimer {
    pub fn new(query_name: &'static str) -> Self {
        Self {
            query_name,
            start: Instant::now(),
        }
    }

    /// Records the elapsed duration to the histogram.
    pub fn record(self) {
        histogram!(
            "database_query_duration_seconds",
            "query" => self.query_name
        )
        .record(self.start.elapsed().as_secs_f64());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_records_without_panicking() {
        let timer = QueryTimer::new("test_query");
        timer.record();
    }

    #[test]
    fn timer_keeps_query_name() {
        let timer = QueryTimer::new("accept_request");
        assert_eq!(timer.query_name, "accept_request");
    }
}
