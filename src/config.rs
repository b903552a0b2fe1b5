use std::{env, str::FromStr};

use derive_more::{Display, Error};

#[derive(Debug, Display, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[display(fmt = "environment variable '{}' must be set", _0)]
    Missing(#[error(not(source))] String),

    #[display(fmt = "environment variable '{}' has an invalid value", _0)]
    Invalid(#[error(not(source))] String),
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_token_ttl_secs: usize,
    pub refresh_token_ttl_secs: usize,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub db_max_connections: u32,
    pub auth: AuthConfig,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| lookup(key).ok_or_else(|| ConfigError::Missing(key.to_string()));
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: lookup("HOST").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: parse_or(&lookup, "PORT", 8080)?,
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,
            auth: AuthConfig {
                access_secret: required("JWT_ACCESS_SECRET")?,
                refresh_secret: required("JWT_REFRESH_SECRET")?,
                access_token_ttl_secs: parse_or(&lookup, "ACCESS_TOKEN_TTL_SECS", 60 * 60)?,
                refresh_token_ttl_secs: parse_or(&lookup, "REFRESH_TOKEN_TTL_SECS", 5 * 24 * 60 * 60)?,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(key.to_string())),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("DATABASE_URL", "postgres://localhost/gifts"),
        ("JWT_ACCESS_SECRET", "access"),
        ("JWT_REFRESH_SECRET", "refresh"),
    ];

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup_from(&REQUIRED)).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.auth.access_token_ttl_secs, 3600);
    }

    #[test]
    fn missing_secret_fails() {
        let res = Config::from_lookup(lookup_from(&REQUIRED[..2]));
        assert_eq!(res.unwrap_err(), ConfigError::Missing("JWT_REFRESH_SECRET".to_string()));
    }

    #[test]
    fn bad_port_fails() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "eighty"));
        let res = Config::from_lookup(lookup_from(&pairs));
        assert_eq!(res.unwrap_err(), ConfigError::Invalid("PORT".to_string()));
    }
}
