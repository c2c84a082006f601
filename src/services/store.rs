// src/services/store.rs
use cached::{Cached, TimedCache};
use log::debug;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::models::{Period, PriceSeries};
use crate::BoxError;

/// Memoization key: one history fetch per (ticker, period).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HistoryKey {
    pub symbol: String,
    pub period: Period,
}

impl HistoryKey {
    pub fn new(symbol: impl Into<String>, period: Period) -> Self {
        HistoryKey {
            symbol: symbol.into(),
            period,
        }
    }
}

/// Time-boxed memoization of history fetches. This is the only caching in
/// the service; entries expire after the configured TTL and are refetched.
pub struct HistoryStore {
    cache: Arc<RwLock<TimedCache<HistoryKey, PriceSeries>>>,
}

impl HistoryStore {
    pub fn new(ttl: Duration) -> Self {
        HistoryStore {
            cache: Arc::new(RwLock::new(TimedCache::with_lifespan(ttl))),
        }
    }

    pub async fn get(&self, key: &HistoryKey) -> Option<PriceSeries> {
        let mut cache = self.cache.write().await;
        cache.cache_get(key).cloned()
    }

    pub async fn insert(&self, key: HistoryKey, series: PriceSeries) {
        let mut cache = self.cache.write().await;
        let _ = cache.cache_set(key, series);
    }

    /// Return the memoized series or run the fetcher and memoize its result.
    pub async fn get_or_fetch<F, Fut>(
        &self,
        key: HistoryKey,
        fetcher: F,
    ) -> Result<PriceSeries, BoxError>
    where
        F: FnOnce() -> Fut,
        Fut: std::future::Future<Output = Result<PriceSeries, BoxError>>,
    {
        if let Some(series) = self.get(&key).await {
            debug!("History cache hit for {:?}", key);
            return Ok(series);
        }
        debug!("History cache miss for {:?}", key);

        let series = fetcher().await?;
        self.insert(key, series.clone()).await;
        Ok(series)
    }

    pub async fn len(&self) -> usize {
        let cache = self.cache.read().await;
        cache.cache_size()
    }
}

impl Clone for HistoryStore {
    fn clone(&self) -> Self {
        HistoryStore {
            cache: Arc::clone(&self.cache),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_series(symbol: &str) -> PriceSeries {
        PriceSeries {
            symbol: symbol.to_string(),
            bars: Vec::new(),
        }
    }

    #[tokio::test]
    async fn insert_and_get() {
        let store = HistoryStore::new(Duration::from_secs(60));
        let key = HistoryKey::new("NVDA", Period::FiveYears);

        store.insert(key.clone(), sample_series("NVDA")).await;
        let hit = store.get(&key).await;
        assert_eq!(hit.unwrap().symbol, "NVDA");
    }

    #[tokio::test]
    async fn keys_differ_by_period() {
        let store = HistoryStore::new(Duration::from_secs(60));
        store
            .insert(
                HistoryKey::new("NVDA", Period::OneYear),
                sample_series("NVDA"),
            )
            .await;

        assert!(store
            .get(&HistoryKey::new("NVDA", Period::TenYears))
            .await
            .is_none());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn get_or_fetch_calls_fetcher_once() {
        let store = HistoryStore::new(Duration::from_secs(60));
        let key = HistoryKey::new("AMD", Period::OneYear);

        let mut calls = 0;
        let first = store
            .get_or_fetch(key.clone(), || {
                calls += 1;
                async { Ok(sample_series("AMD")) }
            })
            .await
            .unwrap();
        assert_eq!(first.symbol, "AMD");
        assert_eq!(calls, 1);

        let second = store
            .get_or_fetch(key, || {
                calls += 1;
                async { Ok(sample_series("AMD")) }
            })
            .await
            .unwrap();
        assert_eq!(second.symbol, "AMD");
        assert_eq!(calls, 1);
    }

    #[tokio::test]
    async fn get_or_fetch_propagates_errors_without_caching() {
        let store = HistoryStore::new(Duration::from_secs(60));
        let key = HistoryKey::new("BAD", Period::OneYear);

        let result = store
            .get_or_fetch(key.clone(), || async {
                Err::<PriceSeries, BoxError>("fetch failed".into())
            })
            .await;
        assert!(result.is_err());
        assert!(store.get(&key).await.is_none());
    }
}
