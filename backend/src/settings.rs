//! Application settings loaded via OrthoConfig.
//!
//! Values come from `GEOCACHE_*` environment variables (and any OrthoConfig
//! file layer). Session secrets are configured separately through
//! [`crate::inbound::http::session_config`].

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_SIZE: u32 = 10;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SettingsError {
    /// The bind address is not a socket address.
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr {
        /// Configured value.
        value: String,
        /// Parser message.
        message: String,
    },
    /// A pool size of zero was configured.
    #[error("database pool size must be at least 1")]
    EmptyPool,
}

/// Server and persistence settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "GEOCACHE")]
pub struct AppSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL; the in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub pool_size: Option<u32>,
    /// Apply pending migrations before serving.
    #[ortho_config(default = false)]
    pub migrate_on_start: bool,
    /// Seed the demo catalogue for this profile id before serving.
    pub seed_demo_author: Option<i64>,
}

impl AppSettings {
    /// Parsed bind address, falling back to `0.0.0.0:8080`.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Pool size, falling back to 10.
    pub fn pool_size(&self) -> Result<u32, SettingsError> {
        match self.pool_size.unwrap_or(DEFAULT_POOL_SIZE) {
            0 => Err(SettingsError::EmptyPool),
            size => Ok(size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 5] = [
        "GEOCACHE_BIND_ADDR",
        "GEOCACHE_DATABASE_URL",
        "GEOCACHE_POOL_SIZE",
        "GEOCACHE_MIGRATE_ON_START",
        "GEOCACHE_SEED_DEMO_AUTHOR",
    ];

    fn load_with(overrides: &[(&str, &str)]) -> AppSettings {
        let vars = VARS.map(|name| {
            let value = overrides
                .iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_owned());
            (name, value)
        });
        let _guard = lock_env(vars);
        AppSettings::load_from_iter([OsString::from("geocache")]).expect("settings should load")
    }

    #[rstest]
    fn defaults_apply_when_unset() {
        let settings = load_with(&[]);

        assert_eq!(
            settings.bind_addr().expect("default address"),
            "0.0.0.0:8080".parse().expect("literal address")
        );
        assert_eq!(settings.pool_size(), Ok(10));
        assert!(settings.database_url.is_none());
        assert!(!settings.migrate_on_start);
        assert!(settings.seed_demo_author.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let settings = load_with(&[
            ("GEOCACHE_BIND_ADDR", "127.0.0.1:9000"),
            ("GEOCACHE_DATABASE_URL", "postgres://localhost/geocache"),
            ("GEOCACHE_POOL_SIZE", "4"),
            ("GEOCACHE_MIGRATE_ON_START", "true"),
            ("GEOCACHE_SEED_DEMO_AUTHOR", "1"),
        ]);

        assert_eq!(
            settings.bind_addr().expect("configured address"),
            "127.0.0.1:9000".parse().expect("literal address")
        );
        assert_eq!(settings.pool_size(), Ok(4));
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/geocache")
        );
        assert!(settings.migrate_on_start);
        assert_eq!(settings.seed_demo_author, Some(1));
    }

    #[rstest]
    #[case("GEOCACHE_BIND_ADDR", "not-an-address")]
    #[case("GEOCACHE_POOL_SIZE", "0")]
    fn invalid_values_are_reported(#[case] name: &str, #[case] value: &str) {
        let settings = load_with(&[(name, value)]);

        let failed = settings.bind_addr().is_err() || settings.pool_size().is_err();
        assert!(failed, "{name}={value} should be rejected");
    }
}
