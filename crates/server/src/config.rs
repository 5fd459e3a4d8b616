use std::{net::SocketAddr, ops::RangeInclusive, time::Duration};
use thiserror::Error;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";
/// Costs bcrypt accepts
const BCRYPT_COSTS: RangeInclusive<u32> = 4..=31;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{key} has an invalid value: {value}")]
    Invalid { key: &'static str, value: String },
}

/// Runtime settings, read from the environment after `.env` is loaded
#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_ttl_hours: i64,
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
    pub cors_origins: Vec<String>,
    /// Base URL of the WhatsApp bot; notifications are off when unset
    pub whatsapp_service_url: Option<String>,
    pub run_migrations: bool,
    pub bcrypt_cost: u32,
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { key, value })
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key-value source. Empty values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let jwt_ttl_hours = match get("JWT_TTL_HOURS") {
            Some(value) => parse("JWT_TTL_HOURS", value)?,
            None => 24,
        };
        if jwt_ttl_hours <= 0 {
            return Err(ConfigError::Invalid {
                key: "JWT_TTL_HOURS",
                value: jwt_ttl_hours.to_string(),
            });
        }

        let port = match get("SERVER_PORT") {
            Some(value) => parse("SERVER_PORT", value)?,
            None => 8080,
        };
        let request_timeout = match get("REQUEST_TIMEOUT_SECS") {
            Some(value) => Duration::from_secs(parse("REQUEST_TIMEOUT_SECS", value)?),
            None => Duration::from_secs(30),
        };
        if request_timeout.is_zero() {
            return Err(ConfigError::Invalid {
                key: "REQUEST_TIMEOUT_SECS",
                value: "0".to_string(),
            });
        }
        let run_migrations = match get("RUN_MIGRATIONS") {
            Some(value) => parse("RUN_MIGRATIONS", value)?,
            None => true,
        };
        let bcrypt_cost = match get("BCRYPT_COST") {
            Some(value) => parse("BCRYPT_COST", value)?,
            None => bcrypt::DEFAULT_COST,
        };
        if !BCRYPT_COSTS.contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        let cors_origins = get("CORS_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_ttl_hours,
            host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port,
            request_timeout,
            cors_origins,
            whatsapp_service_url: get("WHATSAPP_SERVICE_URL")
                .map(|url| url.trim().trim_end_matches('/').to_string()),
            run_migrations,
            bcrypt_cost,
        })
    }

    pub fn address(&self) -> Result<SocketAddr, ConfigError> {
        let address = format!("{}:{}", self.host, self.port);
        parse("SERVER_HOST", address)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://localhost/siaku"),
            ("JWT_SECRET", "secret"),
        ]))
        .unwrap();

        assert_eq!(config.jwt_ttl_hours, 24);
        assert_eq!(config.port, 8080);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(
            config.cors_origins,
            vec!["http://localhost:3000", "http://localhost:5173"]
        );
        assert_eq!(config.whatsapp_service_url, None);
        assert!(config.run_migrations);
        assert_eq!(config.address().unwrap().to_string(), "0.0.0.0:8080");
    }

    #[test]
    fn test_required_and_invalid_values() {
        assert_eq!(
            Config::from_lookup(lookup(&[("JWT_SECRET", "secret")])).unwrap_err(),
            ConfigError::Missing("DATABASE_URL")
        );
        assert_eq!(
            Config::from_lookup(lookup(&[("DATABASE_URL", "x"), ("JWT_SECRET", " ")]))
                .unwrap_err(),
            ConfigError::Missing("JWT_SECRET")
        );
        assert!(matches!(
            Config::from_lookup(lookup(&[
                ("DATABASE_URL", "x"),
                ("JWT_SECRET", "secret"),
                ("SERVER_PORT", "http"),
            ])),
            Err(ConfigError::Invalid { key: "SERVER_PORT", .. })
        ));

        let with = |key: &'static str, value: &'static str| {
            Config::from_lookup(lookup(&[
                ("DATABASE_URL", "x"),
                ("JWT_SECRET", "secret"),
                (key, value),
            ]))
        };
        assert!(matches!(
            with("REQUEST_TIMEOUT_SECS", "0"),
            Err(ConfigError::Invalid { key: "REQUEST_TIMEOUT_SECS", .. })
        ));
        assert!(matches!(
            with("BCRYPT_COST", "3"),
            Err(ConfigError::Invalid { key: "BCRYPT_COST", .. })
        ));
        assert!(matches!(
            with("BCRYPT_COST", "32"),
            Err(ConfigError::Invalid { key: "BCRYPT_COST", .. })
        ));
        assert_eq!(with("BCRYPT_COST", "4").unwrap().bcrypt_cost, 4);
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "x"),
            ("JWT_SECRET", "secret"),
            ("SERVER_HOST", "127.0.0.1"),
            ("SERVER_PORT", "9000"),
            ("CORS_ORIGINS", "https://siaku.ac.id, "),
            ("WHATSAPP_SERVICE_URL", "http://localhost:3000/"),
            ("RUN_MIGRATIONS", "false"),
        ]))
        .unwrap();

        assert_eq!(config.cors_origins, vec!["https://siaku.ac.id"]);
        assert_eq!(
            config.whatsapp_service_url.as_deref(),
            Some("http://localhost:3000")
        );
        assert!(!config.run_migrations);
        assert_eq!(config.address().unwrap().to_string(), "127.0.0.1:9000");
    }
}
