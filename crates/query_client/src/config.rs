/// Tuning knobs for a [`crate::QueryClient`].
///
/// The default values are the only ones the page bootstrap uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryClientConfig {
    /// Age in milliseconds after which cached data is considered stale. `0` means data is stale
    /// as soon as it lands, so every fetch goes to the network.
    pub stale_time_ms: u64,
    /// How long an entry without observers survives before garbage collection.
    pub gc_time_ms: u64,
    /// Extra attempts after the first failed fetch.
    pub retry: u32,
    /// Upper bound for the exponential retry delay.
    pub retry_delay_max_ms: u64,
}

impl Default for QueryClientConfig {
    fn default() -> Self {
        Self {
            stale_time_ms: 0,
            gc_time_ms: 5 * 60 * 1000,
            retry: 3,
            retry_delay_max_ms: 30_000,
        }
    }
}

impl QueryClientConfig {
    /// Returns the delay before the retry that follows `failure_index` (zero-based) failures.
    pub fn retry_delay_ms(&self, failure_index: u32) -> u64 {
        1u64.checked_shl(failure_index)
            .unwrap_or(u64::MAX)
            .saturating_mul(1000)
            .min(self.retry_delay_max_ms)
    }

    /// Returns whether data updated at `updated_at_ms` is stale at `now_ms`.
    pub fn is_stale(&self, updated_at_ms: u64, now_ms: u64) -> bool {
        now_ms.saturating_sub(updated_at_ms) >= self.stale_time_ms
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_delay_doubles_until_capped() {
        let config = QueryClientConfig::default();
        assert_eq!(config.retry_delay_ms(0), 1000);
        assert_eq!(config.retry_delay_ms(1), 2000);
        assert_eq!(config.retry_delay_ms(4), 16_000);
        assert_eq!(config.retry_delay_ms(5), 30_000);
        assert_eq!(config.retry_delay_ms(80), 30_000);
    }

    #[test]
    fn zero_stale_time_is_always_stale() {
        let config = QueryClientConfig::default();
        assert!(config.is_stale(100, 100));

        let config = QueryClientConfig {
            stale_time_ms: 50,
            ..QueryClientConfig::default()
        };
        assert!(!config.is_stale(100, 149));
        assert!(config.is_stale(100, 150));
    }
}
