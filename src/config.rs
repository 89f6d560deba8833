//! TOML configuration.
//!
//! ```toml
//! [db]
//! url = "sqlite:./data/recipes.sqlite"
//! name = "recipes"
//!
//! [server]
//! bind = "0.0.0.0:8000"
//! ```
//!
//! The `[db]` section is optional; without it the server runs with no
//! document store. `DATABASE_URL`, `DATABASE_NAME` and `PORT` from the
//! environment override the file.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::Path;

pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
pub const DATABASE_NAME_VAR: &str = "DATABASE_NAME";
pub const PORT_VAR: &str = "PORT";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub db: Option<DbConfig>,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DbConfig {
    /// SQLite connection URL, e.g. `sqlite:./data/recipes.sqlite`.
    pub url: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

impl Config {
    /// No document store, default bind address.
    pub fn minimal() -> Self {
        Self {
            db: None,
            server: ServerConfig::default(),
        }
    }

    /// Apply `DATABASE_URL`, `DATABASE_NAME` and `PORT` overrides.
    ///
    /// `lookup` returns the value of an environment variable, if set.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(DATABASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            let name = self.db.take().and_then(|db| db.name);
            self.db = Some(DbConfig { url, name });
        }

        if let Some(name) = lookup(DATABASE_NAME_VAR).filter(|v| !v.trim().is_empty()) {
            if let Some(db) = &mut self.db {
                db.name = Some(name);
            }
        }

        if let Some(port) = lookup(PORT_VAR).filter(|v| !v.trim().is_empty()) {
            let port: u16 = port
                .trim()
                .parse()
                .with_context(|| format!("{} must be a port number, got '{}'", PORT_VAR, port))?;
            let mut addr = self.bind_addr()?;
            addr.set_port(port);
            self.server.bind = addr.to_string();
        }

        Ok(())
    }

    /// The parsed `server.bind` address.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        self.server
            .bind
            .parse()
            .with_context(|| format!("server.bind is not a socket address: '{}'", self.server.bind))
    }

    fn validate(&self) -> Result<()> {
        self.bind_addr()?;

        if let Some(db) = &self.db {
            if db.url.trim().is_empty() {
                bail!("db.url must not be empty");
            }
        }

        Ok(())
    }
}

/// Read, parse, apply environment overrides and validate a config file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;

    config.apply_env(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

/// Like [`load_config`], but a missing file yields [`Config::minimal`]
/// with environment overrides applied.
pub fn load_or_minimal(path: &Path) -> Result<Config> {
    if path.exists() {
        return load_config(path);
    }

    tracing::info!(path = %path.display(), "config file not found, using defaults");
    let mut config = Config::minimal();
    config.apply_env(|key| std::env::var(key).ok())?;
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_parse_full() {
        let config: Config = toml::from_str(
            r#"
[db]
url = "sqlite:./recipes.sqlite"
name = "recipes"

[server]
bind = "127.0.0.1:9000"
"#,
        )
        .unwrap();
        let db = config.db.as_ref().unwrap();
        assert_eq!(db.url, "sqlite:./recipes.sqlite");
        assert_eq!(db.name.as_deref(), Some("recipes"));
        assert_eq!(config.bind_addr().unwrap().port(), 9000);
    }

    #[test]
    fn test_parse_empty_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.db.is_none());
        assert_eq!(config.server.bind, "0.0.0.0:8000");
    }

    #[test]
    fn test_port_override() {
        let mut config = Config::minimal();
        config.apply_env(env(&[("PORT", "8123")])).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:8123");
    }

    #[test]
    fn test_invalid_port_rejected() {
        let mut config = Config::minimal();
        assert!(config.apply_env(env(&[("PORT", "http")])).is_err());
    }

    #[test]
    fn test_database_url_creates_db_section() {
        let mut config = Config::minimal();
        config
            .apply_env(env(&[
                ("DATABASE_URL", "sqlite::memory:"),
                ("DATABASE_NAME", "test"),
            ]))
            .unwrap();
        let db = config.db.unwrap();
        assert_eq!(db.url, "sqlite::memory:");
        assert_eq!(db.name.as_deref(), Some("test"));
    }

    #[test]
    fn test_database_name_alone_is_ignored() {
        let mut config = Config::minimal();
        config.apply_env(env(&[("DATABASE_NAME", "test")])).unwrap();
        assert!(config.db.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_bind() {
        let mut config = Config::minimal();
        config.server.bind = "localhost".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_db_url() {
        let mut config = Config::minimal();
        config.db = Some(DbConfig {
            url: "  ".to_string(),
            name: None,
        });
        assert!(config.validate().is_err());
    }
}
