//! Session-scoped exchange rate cache.
//!
//! One cache is created per batch calculation and dropped with it. The plain
//! [`ExchangeRateCache`] requires `&mut self` for lookups; workers either take
//! a [`ExchangeRateCache::fork`] of the preloaded session cache or share a
//! [`SharedExchangeRateCache`].

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::errors::ValuationError;
use super::exchange_rate::ExchangeRate;
use super::provider::{ExchangeRateProvider, RateSource};
use crate::domain::shared::{CurrencyCode, CurrencyPair};

/// Hit/miss counters for one cache session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStatistics {
    /// Lookups answered without calling the provider.
    pub hits: u64,
    /// Lookups that went to the provider.
    pub misses: u64,
    /// Distinct pairs held in the cache.
    pub cached_pairs: usize,
}

impl CacheStatistics {
    /// Total lookups.
    #[must_use]
    pub const fn total_requests(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups served from the cache, 0.0 when idle.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.total_requests();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Fold another session's counters into this one.
    ///
    /// `cached_pairs` keeps the larger value since forks start from the same
    /// preloaded pairs.
    pub fn merge(&mut self, other: &Self) {
        self.hits += other.hits;
        self.misses += other.misses;
        self.cached_pairs = self.cached_pairs.max(other.cached_pairs);
    }
}

/// Memoizes provider lookups by directed currency pair for one batch.
pub struct ExchangeRateCache {
    provider: Arc<dyn ExchangeRateProvider>,
    as_of: NaiveDate,
    rates: HashMap<CurrencyPair, ExchangeRate>,
    hits: u64,
    misses: u64,
}

impl ExchangeRateCache {
    /// Create an empty cache that looks up rates for `as_of`.
    #[must_use]
    pub fn new(provider: Arc<dyn ExchangeRateProvider>, as_of: NaiveDate) -> Self {
        Self {
            provider,
            as_of,
            rates: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    /// Date used for provider lookups.
    #[must_use]
    pub const fn as_of(&self) -> NaiveDate {
        self.as_of
    }

    /// Rate for `from` into `to`.
    ///
    /// Same-currency lookups return an identity rate without touching the
    /// provider and count as hits.
    ///
    /// # Errors
    ///
    /// Propagates the provider's error on a miss. Nothing is cached on failure.
    pub fn get_rate(
        &mut self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<ExchangeRate, ValuationError> {
        if from == to {
            self.hits += 1;
            return Ok(ExchangeRate::identity(from.clone(), self.as_of));
        }

        let pair = CurrencyPair::new(from.clone(), to.clone());
        if let Some(rate) = self.rates.get(&pair) {
            self.hits += 1;
            return Ok(rate.clone());
        }

        self.misses += 1;
        debug!(pair = %pair, as_of = %self.as_of, "Exchange rate cache miss");
        let rate = self.provider.get_rate(from, to, self.as_of)?;
        self.rates.insert(pair, rate.clone());
        Ok(rate)
    }

    /// Load `currency -> target` rates ahead of netting.
    ///
    /// Failures are logged and skipped. Returns the number of currencies
    /// whose rate is now available.
    pub fn preload_rates<'a, I>(&mut self, currencies: I, target: &CurrencyCode) -> usize
    where
        I: IntoIterator<Item = &'a CurrencyCode>,
    {
        let mut loaded = 0;
        for currency in currencies {
            match self.get_rate(currency, target) {
                Ok(_) => loaded += 1,
                Err(e) => {
                    warn!(
                        currency = %currency,
                        target = %target,
                        error = %e,
                        "Failed to preload exchange rate"
                    );
                }
            }
        }
        debug!(loaded, cached_pairs = self.rates.len(), "Exchange rates preloaded");
        loaded
    }

    /// Current counters.
    #[must_use]
    pub fn statistics(&self) -> CacheStatistics {
        CacheStatistics {
            hits: self.hits,
            misses: self.misses,
            cached_pairs: self.rates.len(),
        }
    }

    /// Drop all cached rates and reset counters.
    pub fn clear(&mut self) {
        self.rates.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Copy of this cache's rates with fresh counters, for a chunk worker.
    #[must_use]
    pub fn fork(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            as_of: self.as_of,
            rates: self.rates.clone(),
            hits: 0,
            misses: 0,
        }
    }

    /// Wrap this cache for use from several threads.
    #[must_use]
    pub fn into_shared(self) -> SharedExchangeRateCache {
        SharedExchangeRateCache {
            inner: Arc::new(Mutex::new(self)),
        }
    }
}

impl fmt::Debug for ExchangeRateCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExchangeRateCache")
            .field("as_of", &self.as_of)
            .field("cached_pairs", &self.rates.len())
            .field("hits", &self.hits)
            .field("misses", &self.misses)
            .finish_non_exhaustive()
    }
}

impl RateSource for ExchangeRateCache {
    fn rate(
        &mut self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<ExchangeRate, ValuationError> {
        self.get_rate(from, to)
    }
}

/// Clonable, mutex-guarded handle over one [`ExchangeRateCache`].
#[derive(Debug, Clone)]
pub struct SharedExchangeRateCache {
    inner: Arc<Mutex<ExchangeRateCache>>,
}

impl SharedExchangeRateCache {
    /// Rate for `from` into `to`, holding the lock for the lookup.
    ///
    /// # Errors
    ///
    /// Propagates the provider's error on a miss.
    pub fn get_rate(
        &self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<ExchangeRate, ValuationError> {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_rate(from, to)
    }

    /// Current counters.
    #[must_use]
    pub fn statistics(&self) -> CacheStatistics {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .statistics()
    }

    /// Drop all cached rates and reset counters.
    pub fn clear(&self) {
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl RateSource for SharedExchangeRateCache {
    fn rate(
        &mut self,
        from: &CurrencyCode,
        to: &CurrencyCode,
    ) -> Result<ExchangeRate, ValuationError> {
        self.get_rate(from, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()
    }

    fn code(s: &str) -> CurrencyCode {
        CurrencyCode::new(s).unwrap()
    }

    /// Provider knowing USD and GBP into EUR, counting calls.
    fn counting_provider(calls: Arc<AtomicUsize>) -> Arc<dyn ExchangeRateProvider> {
        Arc::new(
            move |from: &CurrencyCode,
                  to: &CurrencyCode,
                  date: NaiveDate|
                  -> Result<ExchangeRate, ValuationError> {
                calls.fetch_add(1, Ordering::SeqCst);
                let rate = match from.as_str() {
                    "USD" => dec!(1.2),
                    "GBP" => dec!(1.15),
                    _ => {
                        return Err(ValuationError::RateUnavailable {
                            pair: CurrencyPair::new(from.clone(), to.clone()),
                            date,
                            reason: "unknown currency".to_string(),
                        });
                    }
                };
                ExchangeRate::new(rate, from.clone(), to.clone(), date)
            },
        )
    }

    #[test]
    fn identity_lookup_is_a_hit_without_provider_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut cache = ExchangeRateCache::new(counting_provider(Arc::clone(&calls)), as_of());

        let rate = cache.get_rate(&CurrencyCode::eur(), &CurrencyCode::eur()).unwrap();

        assert_eq!(rate.rate(), Decimal::ONE);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let stats = cache.statistics();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.cached_pairs, 0);
    }

    #[test]
    fn first_lookup_misses_then_hits() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut cache = ExchangeRateCache::new(counting_provider(Arc::clone(&calls)), as_of());

        let first = cache.get_rate(&code("USD"), &CurrencyCode::eur()).unwrap();
        let second = cache.get_rate(&code("usd"), &CurrencyCode::eur()).unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let stats = cache.statistics();
        assert_eq!((stats.hits, stats.misses, stats.cached_pairs), (1, 1, 1));
        assert!((stats.hit_rate() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn provider_failure_propagates_and_is_not_cached() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut cache = ExchangeRateCache::new(counting_provider(Arc::clone(&calls)), as_of());

        let err = cache.get_rate(&code("JPY"), &CurrencyCode::eur()).unwrap_err();
        assert!(err.is_rate_unavailable());
        assert!(cache.get_rate(&code("JPY"), &CurrencyCode::eur()).is_err());

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.statistics().cached_pairs, 0);
    }

    #[test]
    fn preload_skips_failures() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut cache = ExchangeRateCache::new(counting_provider(Arc::clone(&calls)), as_of());
        let currencies = [code("USD"), code("JPY"), code("GBP"), CurrencyCode::eur()];

        let loaded = cache.preload_rates(&currencies, &CurrencyCode::eur());

        assert_eq!(loaded, 3);
        assert_eq!(cache.statistics().cached_pairs, 2);

        calls.store(0, Ordering::SeqCst);
        cache.get_rate(&code("GBP"), &CurrencyCode::eur()).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn clear_resets_rates_and_counters() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut cache = ExchangeRateCache::new(counting_provider(calls), as_of());
        cache.get_rate(&code("USD"), &CurrencyCode::eur()).unwrap();

        cache.clear();

        assert_eq!(cache.statistics(), CacheStatistics::default());
    }

    #[test]
    fn fork_keeps_rates_with_fresh_counters() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut cache = ExchangeRateCache::new(counting_provider(Arc::clone(&calls)), as_of());
        cache.get_rate(&code("USD"), &CurrencyCode::eur()).unwrap();

        let mut fork = cache.fork();
        assert_eq!(fork.statistics().hits, 0);
        fork.get_rate(&code("USD"), &CurrencyCode::eur()).unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(fork.statistics().hits, 1);
        assert_eq!(cache.statistics().hits, 0);
    }

    #[test]
    fn statistics_merge_adds_counters() {
        let mut a = CacheStatistics {
            hits: 3,
            misses: 1,
            cached_pairs: 2,
        };
        a.merge(&CacheStatistics {
            hits: 5,
            misses: 2,
            cached_pairs: 3,
        });
        assert_eq!(a.hits, 8);
        assert_eq!(a.misses, 3);
        assert_eq!(a.cached_pairs, 3);
        assert_eq!(a.total_requests(), 11);
        assert!(CacheStatistics::default().hit_rate().abs() < f64::EPSILON);
    }

    #[test]
    fn shared_cache_serves_all_handles() {
        let calls = Arc::new(AtomicUsize::new(0));
        let shared =
            ExchangeRateCache::new(counting_provider(Arc::clone(&calls)), as_of()).into_shared();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let cache = shared.clone();
                std::thread::spawn(move || {
                    cache.get_rate(&code("USD"), &CurrencyCode::eur()).unwrap()
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap().rate(), dec!(1.2));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(shared.statistics().total_requests(), 4);
        shared.clear();
        assert_eq!(shared.statistics().cached_pairs, 0);
    }
}
