//! API client configuration

/// Default API root, including the `/api/` prefix.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/";

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const BASE_URL_ENV: &str = "LAB_BOOKING_API_BASE_URL";
pub const TIMEOUT_ENV: &str = "LAB_BOOKING_API_TIMEOUT_SECS";

/// Connection settings for the lab booking API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// API root (e.g., "http://localhost:8000/api/")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: format!("lab-booking-api/{}", env!("CARGO_PKG_VERSION")),
        }
    }

    /// Read settings from the environment, loading `.env` first if present.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Missing or unparsable values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match lookup(TIMEOUT_ENV) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                tracing::warn!(value = %raw, "invalid {}, using default", TIMEOUT_ENV);
                DEFAULT_TIMEOUT_SECS
            }),
            None => DEFAULT_TIMEOUT_SECS,
        };

        Self::new(base_url).with_timeout(timeout_secs)
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_secs = seconds;
        self
    }

    /// Set the User-Agent header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Absolute URL for a path relative to the API root.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_lookup(lookup(&[]));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 30);
        assert!(config.user_agent.starts_with("lab-booking-api/"));
    }

    #[test]
    fn test_overrides() {
        let config = ApiConfig::from_lookup(lookup(&[
            (BASE_URL_ENV, "https://lab.example.com/api"),
            (TIMEOUT_ENV, "5"),
        ]));
        assert_eq!(config.base_url, "https://lab.example.com/api");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_bad_timeout_falls_back() {
        let config = ApiConfig::from_lookup(lookup(&[(TIMEOUT_ENV, "soon")]));
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }

    #[test]
    fn test_url_joining() {
        let with_slash = ApiConfig::new("http://localhost:8000/api/");
        let without = ApiConfig::new("http://localhost:8000/api");
        assert_eq!(with_slash.url("bookings/"), "http://localhost:8000/api/bookings/");
        assert_eq!(without.url("/bookings/"), "http://localhost:8000/api/bookings/");
    }
}
