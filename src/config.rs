use std::net::SocketAddr;

use anyhow::Context;

pub const DEFAULT_LOG_FILTER: &str = "ajungem=info,tower_http=info";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub session_secure: bool,
    pub session_inactivity_minutes: i64,
    /// Enables `POST /login/dev`, which signs in by email alone.
    pub allow_dev_login: bool,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: "sqlite://ajungem.db?mode=rwc".to_owned(),
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            db_max_connections: 16,
            session_secure: false,
            session_inactivity_minutes: 60,
            allow_dev_login: false,
            log_filter: DEFAULT_LOG_FILTER.to_owned(),
        }
    }
}

impl Config {
    /// Reads the environment, after loading `.env` if there is one.
    pub fn from_env() -> anyhow::Result<Config> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Config> {
        let defaults = Config::default();

        let bind_addr = match lookup("BIND_ADDR") {
            Some(addr) => addr
                .parse()
                .with_context(|| format!("BIND_ADDR is not a socket address: {addr}"))?,
            None => defaults.bind_addr,
        };

        let db_max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", defaults.db_max_connections)?;
        anyhow::ensure!(db_max_connections > 0, "DB_MAX_CONNECTIONS must be at least 1");

        let session_inactivity_minutes = parse_or(
            &lookup,
            "SESSION_INACTIVITY_MINUTES",
            defaults.session_inactivity_minutes,
        )?;
        anyhow::ensure!(
            session_inactivity_minutes > 0,
            "SESSION_INACTIVITY_MINUTES must be a positive number of minutes"
        );

        Ok(Config {
            database_url: lookup("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr,
            db_max_connections,
            session_secure: parse_flag(&lookup, "SESSION_SECURE", defaults.session_secure)?,
            session_inactivity_minutes,
            allow_dev_login: parse_flag(&lookup, "ALLOW_DEV_LOGIN", defaults.allow_dev_login)?,
            log_filter: lookup("RUST_LOG").unwrap_or(defaults.log_filter),
        })
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{key} has an invalid value: {value}")),
        None => Ok(default),
    }
}

fn parse_flag(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> anyhow::Result<bool> {
    let Some(value) = lookup(key) else {
        return Ok(default);
    };
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => anyhow::bail!("{key} must be true or false, got {value}"),
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
    fn empty_environment_uses_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.database_url, "sqlite://ajungem.db?mode=rwc");
        assert_eq!(config.bind_addr.port(), 8080);
        assert!(!config.allow_dev_login);
        assert_eq!(config.log_filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite::memory:"),
            ("BIND_ADDR", "127.0.0.1:3000"),
            ("SESSION_SECURE", "TRUE"),
            ("SESSION_INACTIVITY_MINUTES", "15"),
            ("ALLOW_DEV_LOGIN", "1"),
        ]))
        .unwrap();
        assert_eq!(config.database_url, "sqlite::memory:");
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert!(config.session_secure);
        assert_eq!(config.session_inactivity_minutes, 15);
        assert!(config.allow_dev_login);
    }

    #[test]
    fn rejects_garbage() {
        assert!(Config::from_lookup(lookup(&[("ALLOW_DEV_LOGIN", "maybe")])).is_err());
        assert!(Config::from_lookup(lookup(&[("DB_MAX_CONNECTIONS", "lots")])).is_err());
        assert!(Config::from_lookup(lookup(&[("BIND_ADDR", "nowhere")])).is_err());
    }

    #[test]
    fn rejects_unusable_pool_and_session_settings() {
        assert!(Config::from_lookup(lookup(&[("DB_MAX_CONNECTIONS", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("SESSION_INACTIVITY_MINUTES", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("SESSION_INACTIVITY_MINUTES", "-5")])).is_err());
        assert!(Config::from_lookup(lookup(&[("DB_MAX_CONNECTIONS", "1")])).is_ok());
    }
}
