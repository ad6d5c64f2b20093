//! Blocking HTTP client for the portfolio backend.
//!
//! Handles the session cookie, retries with exponential backoff, rate
//! limiting, and response parsing. All endpoint methods return typed rows
//! from `folio-core`; callers never see raw JSON.

use std::time::Duration;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;

use folio_core::domain::{NewsItem, Portfolio, PriceMap, RebalancePlan, ScorecardEntry};
use folio_core::session::Profile;

use crate::config::ClientConfig;
use crate::error::ApiError;

/// Login request body. The password field name is kept as the backend
/// expects it.
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    #[serde(rename = "hashedPassword")]
    password: &'a str,
}

/// New-account request body.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    #[serde(rename = "fullName")]
    pub full_name: String,
    #[serde(rename = "hashedPassword")]
    pub password: String,
}

pub struct ApiClient {
    client: reqwest::blocking::Client,
    base_url: String,
    session_cookie: Option<String>,
    max_retries: u32,
    base_delay: Duration,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.clone(),
            session_cookie: None,
            max_retries: 3,
            base_delay: Duration::from_millis(500),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.session_cookie.is_some()
    }

    // Path builders are kept as plain functions so the wire format is
    // testable without a server.

    pub fn portfolio_path(date: NaiveDate, num_stocks: u32, investment: f64) -> String {
        format!("/portfolio/{}/{num_stocks}/{investment}", date.format("%Y-%m-%d"))
    }

    pub fn universe_prices_path(date: NaiveDate) -> String {
        format!("/nifty200/{}", date.format("%Y-%m-%d"))
    }

    pub fn rebalance_path(from: NaiveDate, to: NaiveDate, num_stocks: u32, investment: f64) -> String {
        format!(
            "/rebalance/{}/{}/{num_stocks}/{investment}",
            from.format("%Y-%m-%d"),
            to.format("%Y-%m-%d")
        )
    }

    pub fn scorecard_path(date: NaiveDate) -> String {
        format!("/scorecard/{}", date.format("%Y-%m-%d"))
    }

    pub fn stock_news_path(date: NaiveDate) -> String {
        format!("/stocknews/{}", date.format("%Y-%m-%d"))
    }

    /// Sign in and capture the session cookie for subsequent requests.
    pub fn login(&mut self, username: &str, password: &str) -> Result<Profile, ApiError> {
        let body = LoginRequest { username, password };
        let resp = self.post("/login", &body)?;
        let status = resp.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized("invalid username or password".into()));
        }
        if !status.is_success() {
            return Err(Self::server_error(status, "/login"));
        }

        self.session_cookie = resp
            .headers()
            .get(reqwest::header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
            .map(session_cookie_from);

        let text = resp
            .text()
            .map_err(|e| ApiError::NetworkUnreachable(e.to_string()))?;
        let mut profile: Profile = serde_json::from_str(&text)
            .map_err(|e| ApiError::ResponseFormatChanged(format!("login response: {e}")))?;
        if profile.username.is_empty() {
            profile.username = username.to_string();
        }
        Ok(profile)
    }

    pub fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let resp = self.post("/register", registration)?;
        let status = resp.status();
        if status == reqwest::StatusCode::CONFLICT {
            return Err(ApiError::Other(format!(
                "username '{}' is already taken",
                registration.username
            )));
        }
        if !status.is_success() {
            return Err(Self::server_error(status, "/register"));
        }
        Ok(())
    }

    /// Sign out. The local cookie is dropped even when the request fails.
    pub fn logout(&mut self) -> Result<(), ApiError> {
        let result = self.post("/logout", &serde_json::json!({}));
        self.session_cookie = None;
        let resp = result?;
        if !resp.status().is_success() {
            return Err(Self::server_error(resp.status(), "/logout"));
        }
        Ok(())
    }

    pub fn profile(&self) -> Result<Profile, ApiError> {
        self.get_json("/profile")
    }

    pub fn update_profile(&self, profile: &Profile) -> Result<(), ApiError> {
        let resp = self.post("/profile", profile)?;
        if !resp.status().is_success() {
            return Err(Self::server_error(resp.status(), "/profile"));
        }
        Ok(())
    }

    pub fn portfolio(
        &self,
        date: NaiveDate,
        num_stocks: u32,
        investment: f64,
    ) -> Result<Portfolio, ApiError> {
        self.get_json(&Self::portfolio_path(date, num_stocks, investment))
    }

    pub fn universe_prices(&self, date: NaiveDate) -> Result<PriceMap, ApiError> {
        self.get_json(&Self::universe_prices_path(date))
    }

    pub fn rebalance(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        num_stocks: u32,
        investment: f64,
    ) -> Result<RebalancePlan, ApiError> {
        self.get_json(&Self::rebalance_path(from, to, num_stocks, investment))
    }

    pub fn scorecard(&self, date: NaiveDate) -> Result<Vec<ScorecardEntry>, ApiError> {
        self.get_json(&Self::scorecard_path(date))
    }

    pub fn stock_news(&self, date: NaiveDate) -> Result<Vec<NewsItem>, ApiError> {
        self.get_json(&Self::stock_news_path(date))
    }

    fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let text = self.get_text(path)?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::ResponseFormatChanged(format!("{path}: {e}")))
    }

    /// Execute a GET with retry and backoff, returning the raw body. The
    /// response-cache layer keys on `path` and stores this body.
    pub fn get_text(&self, path: &str) -> Result<String, ApiError> {
        let url = format!("{}{path}", self.base_url);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                std::thread::sleep(delay);
            }

            let mut request = self.client.get(&url);
            if let Some(cookie) = &self.session_cookie {
                request = request.header(reqwest::header::COOKIE, cookie);
            }

            match request.send() {
                Ok(resp) => {
                    let status = resp.status();

                    if status == reqwest::StatusCode::UNAUTHORIZED {
                        return Err(ApiError::Unauthorized("session expired or not signed in".into()));
                    }

                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(ApiError::NotFound {
                            resource: path.to_string(),
                        });
                    }

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        let retry_after = resp
                            .headers()
                            .get("retry-after")
                            .and_then(|v| v.to_str().ok())
                            .and_then(|v| v.parse::<u64>().ok())
                            .unwrap_or(60);
                        last_error = Some(ApiError::RateLimited {
                            retry_after_secs: retry_after,
                        });
                        continue;
                    }

                    if !status.is_success() {
                        last_error = Some(Self::server_error(status, path));
                        continue;
                    }

                    return resp
                        .text()
                        .map_err(|e| ApiError::NetworkUnreachable(e.to_string()));
                }
                Err(e) => {
                    if e.is_connect() || e.is_timeout() {
                        last_error = Some(ApiError::NetworkUnreachable(e.to_string()));
                        continue;
                    }
                    return Err(ApiError::NetworkUnreachable(e.to_string()));
                }
            }
        }

        Err(last_error.unwrap_or_else(|| ApiError::Other("max retries exceeded".into())))
    }

    fn post<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::blocking::Response, ApiError> {
        let url = format!("{}{path}", self.base_url);
        let mut request = self.client.post(&url).json(body);
        if let Some(cookie) = &self.session_cookie {
            request = request.header(reqwest::header::COOKIE, cookie);
        }
        request
            .send()
            .map_err(|e| ApiError::NetworkUnreachable(e.to_string()))
    }

    fn server_error(status: reqwest::StatusCode, path: &str) -> ApiError {
        ApiError::Server {
            status: status.as_u16(),
            message: format!(
                "{path}: {}",
                status.canonical_reason().unwrap_or("unknown status")
            ),
        }
    }
}

/// Extract the cookie pair from a `Set-Cookie` header value, dropping
/// attributes like `Path` and `HttpOnly`.
fn session_cookie_from(header: &str) -> String {
    header
        .split(';')
        .next()
        .unwrap_or(header)
        .trim()
        .to_string()
}
