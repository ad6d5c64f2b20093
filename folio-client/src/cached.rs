//! Response-caching wrapper around [`ApiClient`].
//!
//! GET responses are cached by request path so repeated navigation between
//! the same dates does not re-hit the backend. The cache is bounded, holds
//! raw bodies, and is scoped to one sign-in: login and logout clear it.

use std::sync::Mutex;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use folio_core::cache::LruCache;
use folio_core::domain::{NewsItem, Portfolio, PriceMap, RebalancePlan, ScorecardEntry};
use folio_core::session::Profile;

use crate::api::{ApiClient, Registration};
use crate::config::ClientConfig;
use crate::error::ApiError;

pub struct CachedClient {
    api: ApiClient,
    capacity: usize,
    cache: Mutex<LruCache<String>>,
}

impl CachedClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            api: ApiClient::new(config),
            capacity: config.cache_capacity,
            cache: Mutex::new(LruCache::new(config.cache_capacity)),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.api.is_signed_in()
    }

    pub fn cache_len(&self) -> usize {
        self.lock_cache().len()
    }

    pub fn login(&mut self, username: &str, password: &str) -> Result<Profile, ApiError> {
        let profile = self.api.login(username, password)?;
        self.clear_cache();
        Ok(profile)
    }

    pub fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        self.api.register(registration)
    }

    pub fn logout(&mut self) -> Result<(), ApiError> {
        let result = self.api.logout();
        self.clear_cache();
        result
    }

    pub fn profile(&self) -> Result<Profile, ApiError> {
        self.api.profile()
    }

    pub fn update_profile(&self, profile: &Profile) -> Result<(), ApiError> {
        self.api.update_profile(profile)
    }

    pub fn portfolio(
        &self,
        date: NaiveDate,
        num_stocks: u32,
        investment: f64,
    ) -> Result<Portfolio, ApiError> {
        self.get_cached(&ApiClient::portfolio_path(date, num_stocks, investment))
    }

    pub fn universe_prices(&self, date: NaiveDate) -> Result<PriceMap, ApiError> {
        self.get_cached(&ApiClient::universe_prices_path(date))
    }

    pub fn rebalance(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        num_stocks: u32,
        investment: f64,
    ) -> Result<RebalancePlan, ApiError> {
        self.get_cached(&ApiClient::rebalance_path(from, to, num_stocks, investment))
    }

    pub fn scorecard(&self, date: NaiveDate) -> Result<Vec<ScorecardEntry>, ApiError> {
        self.get_cached(&ApiClient::scorecard_path(date))
    }

    pub fn stock_news(&self, date: NaiveDate) -> Result<Vec<NewsItem>, ApiError> {
        self.get_cached(&ApiClient::stock_news_path(date))
    }

    fn get_cached<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let hit = self.lock_cache().get(path).cloned();
        let body = match hit {
            Some(body) => body,
            None => {
                let body = self.api.get_text(path)?;
                self.lock_cache().insert(path, body.clone());
                body
            }
        };
        serde_json::from_str(&body)
            .map_err(|e| ApiError::ResponseFormatChanged(format!("{path}: {e}")))
    }

    fn clear_cache(&self) {
        *self.lock_cache() = LruCache::new(self.capacity);
    }

    fn lock_cache(&self) -> std::sync::MutexGuard<'_, LruCache<String>> {
        self.cache
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[cfg(test)]
    pub(crate) fn prime(&self, path: &str, body: &str) {
        self.lock_cache().insert(path, body.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> CachedClient {
        // Unroutable address; any cache miss that reaches the network fails.
        CachedClient::new(&ClientConfig {
            base_url: "http://127.0.0.1:9".into(),
            timeout_secs: 1,
            cache_capacity: 4,
        })
    }

    #[test]
    fn cached_body_is_served_without_the_network() {
        let client = client();
        let date = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        client.prime(
            &ApiClient::universe_prices_path(date),
            r#"{"IOC": 130.5, "TCS": 4100.0}"#,
        );
        let prices = client.universe_prices(date).unwrap();
        assert_eq!(prices["IOC"], 130.5);
        assert_eq!(client.cache_len(), 1);
    }

    #[test]
    fn cached_garbage_is_a_format_error() {
        let client = client();
        let date = NaiveDate::from_ymd_opt(2024, 3, 8).unwrap();
        client.prime(&ApiClient::scorecard_path(date), "not json");
        let err = client.scorecard(date).unwrap_err();
        assert!(matches!(err, ApiError::ResponseFormatChanged(_)));
    }
}
