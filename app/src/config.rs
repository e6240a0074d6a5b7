//! Startup configuration.

pub const BASE_URL_ENV: &str = "API_BASE_URL";
/// Older name for the same setting, read when `API_BASE_URL` is unset.
pub const LEGACY_BASE_URL_ENV: &str = "NEXT_PUBLIC_API_URL";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub base_url: String,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration through `lookup`, trying `API_BASE_URL`
    /// then `NEXT_PUBLIC_API_URL`. An empty or whitespace-only value counts
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let base_url = read(BASE_URL_ENV)
            .or_else(|| read(LEGACY_BASE_URL_ENV))
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self { base_url }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}
