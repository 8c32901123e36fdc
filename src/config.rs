use serde::Deserialize;
use std::time::Duration;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Google AI (Gemini) API key
    pub google_ai_api_key: String,

    /// Google AI API base URL
    #[serde(default = "default_google_ai_api_url")]
    pub google_ai_api_url: String,

    /// Gemini model name
    #[serde(default = "default_google_ai_model")]
    pub google_ai_model: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-request timeout for catalog calls, in seconds
    #[serde(default = "default_catalog_timeout_secs")]
    pub catalog_timeout_secs: u64,

    /// Per-request timeout for agent calls, in seconds
    #[serde(default = "default_agent_timeout_secs")]
    pub agent_timeout_secs: u64,
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_google_ai_api_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_google_ai_model() -> String {
    "gemini-flash-latest".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_catalog_timeout_secs() -> u64 {
    10
}

fn default_agent_timeout_secs() -> u64 {
    30
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(std::env::vars())
    }

    /// Load configuration from an explicit set of key/value pairs
    pub fn from_vars<I>(vars: I) -> anyhow::Result<Self>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        envy::from_iter::<_, Config>(vars).map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn catalog_timeout(&self) -> Duration {
        Duration::from_secs(self.catalog_timeout_secs)
    }

    pub fn agent_timeout(&self) -> Duration {
        Duration::from_secs(self.agent_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_applied() {
        let config = Config::from_vars(vars(&[
            ("TMDB_API_KEY", "tmdb"),
            ("GOOGLE_AI_API_KEY", "google"),
        ]))
        .unwrap();

        assert_eq!(config.tmdb_api_url, "https://api.themoviedb.org/3");
        assert_eq!(config.google_ai_model, "gemini-flash-latest");
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.catalog_timeout(), Duration::from_secs(10));
        assert_eq!(config.agent_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_vars(vars(&[
            ("TMDB_API_KEY", "tmdb"),
            ("GOOGLE_AI_API_KEY", "google"),
            ("PORT", "8080"),
            ("HOST", "0.0.0.0"),
            ("GOOGLE_AI_MODEL", "gemini-2.0-flash"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.google_ai_model, "gemini-2.0-flash");
    }

    #[test]
    fn test_missing_api_key_fails() {
        let result = Config::from_vars(vars(&[("TMDB_API_KEY", "tmdb")]));
        assert!(result.is_err());
    }
}
