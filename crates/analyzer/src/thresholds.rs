/// Default slow-query cut-off in milliseconds.
pub const DEFAULT_SLOW_QUERY_MS: u64 = 200;
/// Default limit on documents examined per document returned.
pub const DEFAULT_MAX_DOCS_PER_RETURNED: f64 = 100.0;

/// Limits the analysis compares a report against.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    /// Queries strictly slower than this are reported as slow.
    pub slow_query_ms: u64,
    /// Above this ratio of docs examined to docs returned the filter is unselective.
    pub max_docs_per_returned: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            slow_query_ms: DEFAULT_SLOW_QUERY_MS,
            max_docs_per_returned: DEFAULT_MAX_DOCS_PER_RETURNED,
        }
    }
}

impl Thresholds {
    pub fn from_builder(builder: ThresholdsBuilder) -> Self {
        Self {
            slow_query_ms: builder.slow_query_ms.unwrap_or(DEFAULT_SLOW_QUERY_MS),
            max_docs_per_returned: builder
                .max_docs_per_returned
                .unwrap_or(DEFAULT_MAX_DOCS_PER_RETURNED),
        }
    }

    pub fn is_slow(&self, execution_time_millis: u64) -> bool {
        execution_time_millis > self.slow_query_ms
    }
}

#[derive(Debug, Default)]
pub struct ThresholdsBuilder {
    pub slow_query_ms: Option<u64>,
    pub max_docs_per_returned: Option<f64>,
}

impl ThresholdsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slow_query_ms(mut self, slow_query_ms: u64) -> Self {
        self.slow_query_ms = Some(slow_query_ms);
        self
    }

    pub fn max_docs_per_returned(mut self, ratio: f64) -> Self {
        self.max_docs_per_returned = Some(ratio);
        self
    }

    pub fn build(self) -> Thresholds {
        Thresholds::from_builder(self)
    }
}
