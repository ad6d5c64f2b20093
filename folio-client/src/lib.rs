//! Folio client — blocking HTTP access to the portfolio backend.
//!
//! [`ApiClient`] speaks the wire protocol (session cookie, retries, typed
//! responses); [`CachedClient`] adds a bounded per-session response cache;
//! [`snapshot`] composes the three analyzer endpoints into one all-or-nothing
//! parallel fetch. Configuration comes from a small TOML file.

pub mod api;
pub mod cached;
pub mod config;
pub mod error;
pub mod snapshot;

pub use api::{ApiClient, Registration};
pub use cached::CachedClient;
pub use config::ClientConfig;
pub use error::ApiError;
pub use snapshot::{fetch_snapshot, news_with_fallback, scorecard_with_fallback, AnalyzerSnapshot};
