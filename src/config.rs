use std::{env, fmt, ops::RangeInclusive, str::FromStr};

use crate::auth::AuthSettings;

/// Errors raised while reading configuration at startup.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "{} has an invalid value: {:?}", key, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Work factors bcrypt accepts.
const BCRYPT_COST_RANGE: RangeInclusive<u32> = 4..=31;
/// Token lifetimes from one hour up to one year.
const JWT_EXPIRATION_RANGE: RangeInclusive<i64> = 1..=8_760;
const MAX_CONNECTIONS_RANGE: RangeInclusive<u32> = 1..=u32::MAX;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub bcrypt_cost: u32,
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default =
            |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            database_url: or_default("DATABASE_URL", "sqlite://tasks.db"),
            database_max_connections: parse_in(
                "DATABASE_MAX_CONNECTIONS",
                or_default("DATABASE_MAX_CONNECTIONS", "5"),
                MAX_CONNECTIONS_RANGE,
            )?,
            server_port: parse("SERVER_PORT", or_default("SERVER_PORT", "8080"))?,
            server_host: or_default("SERVER_HOST", "127.0.0.1"),
            jwt_secret: lookup("JWT_SECRET")
                .filter(|secret| !secret.is_empty())
                .ok_or(ConfigError::Missing("JWT_SECRET"))?,
            jwt_expiration_hours: parse_in(
                "JWT_EXPIRATION_HOURS",
                or_default("JWT_EXPIRATION_HOURS", "24"),
                JWT_EXPIRATION_RANGE,
            )?,
            bcrypt_cost: parse_in(
                "BCRYPT_COST",
                or_default("BCRYPT_COST", "10"),
                BCRYPT_COST_RANGE,
            )?,
            log_level: or_default("LOG_LEVEL", "info"),
        })
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }

    pub fn auth_settings(&self) -> AuthSettings {
        AuthSettings {
            jwt_secret: self.jwt_secret.clone(),
            token_ttl_hours: self.jwt_expiration_hours,
            bcrypt_cost: self.bcrypt_cost,
        }
    }
}

fn parse<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    let parsed = value.trim().parse();
    parsed.map_err(|_| ConfigError::Invalid { key, value })
}

/// Like [`parse`], but also rejects numbers outside `range`.
fn parse_in<T>(key: &'static str, value: String, range: RangeInclusive<T>) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd,
{
    let parsed: T = parse(key, value.clone())?;
    if range.contains(&parsed) {
        Ok(parsed)
    } else {
        Err(ConfigError::Invalid { key, value })
    }
}
