use anyhow::Context;

/// Server settings read from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cache_ttl_secs: i64,
    pub session_idle_secs: i64,
    pub enable_hsts: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            cache_ttl_secs: analysis_orchestrator::CACHE_TTL_SECS,
            session_idle_secs: 7200,
            enable_hsts: false,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values are unset, unparsable numbers are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();
        let lookup = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = match lookup("API_PORT") {
            Some(v) => v.parse().with_context(|| format!("Invalid API_PORT: {v}"))?,
            None => defaults.port,
        };
        let cache_ttl_secs = match lookup("CACHE_TTL_SECS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("Invalid CACHE_TTL_SECS: {v}"))?,
            None => defaults.cache_ttl_secs,
        };
        let session_idle_secs = match lookup("SESSION_IDLE_SECS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("Invalid SESSION_IDLE_SECS: {v}"))?,
            None => defaults.session_idle_secs,
        };

        Ok(Self {
            host: lookup("API_HOST").unwrap_or(defaults.host),
            port,
            cache_ttl_secs,
            session_idle_secs,
            enable_hsts: lookup("ENABLE_HSTS")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(false),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.cache_ttl_secs, 300);
        assert_eq!(config.session_idle_secs, 7200);
        assert!(!config.enable_hsts);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("API_HOST", "0.0.0.0"),
            ("API_PORT", "8080"),
            ("CACHE_TTL_SECS", "60"),
            ("ENABLE_HSTS", "TRUE"),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.cache_ttl_secs, 60);
        assert!(config.enable_hsts);
    }

    #[test]
    fn test_invalid_numbers_are_errors() {
        let err = ServerConfig::from_lookup(lookup(&[("API_PORT", "eighty")])).unwrap_err();
        assert!(err.to_string().contains("API_PORT"));

        assert!(ServerConfig::from_lookup(lookup(&[("SESSION_IDLE_SECS", "2h")])).is_err());
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("API_HOST", " "),
            ("API_PORT", ""),
            ("CACHE_TTL_SECS", ""),
        ]))
        .unwrap();
        assert_eq!(config.bind_addr(), "127.0.0.1:3000");
        assert_eq!(config.cache_ttl_secs, 300);
    }
}
