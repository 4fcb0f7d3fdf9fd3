//! Client configuration.

use url::Url;

use crate::error::Result;

/// Environment variable holding the API base URL.
pub const API_URL_ENV: &str = "DRIVE_API_URL";

/// Base URL used when `DRIVE_API_URL` is unset or empty.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Connection settings for [`ApiClient`](crate::api::ApiClient).
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Root of the API server, without the `/api` prefix.
    pub base_url: Url,
    /// Optional HTTP/SOCKS proxy (e.g., "http://proxy:8080").
    pub proxy: Option<String>,
}

impl ClientConfig {
    /// Build a config for the given base URL.
    pub fn new(base_url: &str) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            proxy: None,
        })
    }

    /// Read the base URL from `DRIVE_API_URL`, falling back to [`DEFAULT_API_URL`].
    pub fn from_env() -> Result<Self> {
        let value = std::env::var(API_URL_ENV).ok();
        Self::from_env_value(value.as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Result<Self> {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            Some(url) => Self::new(url),
            None => Self::new(DEFAULT_API_URL),
        }
    }

    /// Route all requests through a proxy.
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Join an API path (e.g. `/api/files`) onto the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_API_URL).expect("default API URL is valid"),
            proxy: None,
        }
    }
}

// Url::join drops the last segment unless the base ends with '/'.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut raw = raw.trim().to_string();
    if !raw.ends_with('/') {
        raw.push('/');
    }
    Ok(Url::parse(&raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_url() {
        let config = ClientConfig::from_env_value(None).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8000/");
        assert_eq!(config, ClientConfig::default());

        let config = ClientConfig::from_env_value(Some("  ")).unwrap();
        assert_eq!(config.base_url.as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_env_override() {
        let config = ClientConfig::from_env_value(Some("https://files.example.com")).unwrap();
        assert_eq!(
            config.endpoint("/api/files").unwrap().as_str(),
            "https://files.example.com/api/files"
        );
    }

    #[test]
    fn test_base_url_with_path_prefix() {
        let config = ClientConfig::new("https://example.com/storage").unwrap();
        assert_eq!(
            config.endpoint("/api/auth/me").unwrap().as_str(),
            "https://example.com/storage/api/auth/me"
        );
    }

    #[test]
    fn test_invalid_url() {
        assert!(ClientConfig::new("not a url").is_err());
    }

    #[test]
    fn test_proxy() {
        let config = ClientConfig::default().with_proxy("http://127.0.0.1:8080");
        assert_eq!(config.proxy.as_deref(), Some("http://127.0.0.1:8080"));
    }
}
