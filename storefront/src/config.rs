// storefront/src/config.rs

use crate::errors::{AppError, Result};
use dotenvy::dotenv;
use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub database_url: String,
  pub database_max_connections: u32,

  // Cookie carrying the server-side session id
  pub session_cookie_name: String,
  // Sessions untouched for this long are dropped from the registry
  pub session_idle_timeout_secs: u64,

  // Apply schema.sql and seed the product catalog on startup
  pub seed_db: bool,
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|var_name| env::var(var_name).ok())
  }

  /// Builds the config from any variable source; `from_env` passes the process environment.
  pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
    let get_env = |var_name: &str| {
      lookup(var_name).ok_or_else(|| AppError::Config(format!("Missing environment variable '{}'", var_name)))
    };

    let server_host = get_env("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let server_port = get_env("SERVER_PORT")
      .unwrap_or_else(|_| "8080".to_string())
      .parse::<u16>()
      .map_err(|e| AppError::Config(format!("Invalid SERVER_PORT: {}", e)))?;
    let database_url = get_env("DATABASE_URL")?;
    let database_max_connections = get_env("DATABASE_MAX_CONNECTIONS")
      .unwrap_or_else(|_| "5".to_string())
      .parse::<u32>()
      .map_err(|e| AppError::Config(format!("Invalid DATABASE_MAX_CONNECTIONS: {}", e)))?;
    let session_cookie_name = get_env("SESSION_COOKIE_NAME").unwrap_or_else(|_| "wingtip_session".to_string());

    let session_idle_timeout_secs = get_env("SESSION_IDLE_TIMEOUT_SECS")
      .unwrap_or_else(|_| "1800".to_string())
      .parse::<u64>()
      .map_err(|e| AppError::Config(format!("Invalid SESSION_IDLE_TIMEOUT_SECS: {}", e)))?;

    let seed_db = get_env("SEED_DB")
      .unwrap_or_else(|_| "false".to_string())
      .parse::<bool>()
      .map_err(|e| AppError::Config(format!("Invalid SEED_DB value: {}", e)))?;

    tracing::info!("Application configuration loaded successfully.");

    Ok(Self {
      server_host,
      server_port,
      database_url,
      database_max_connections,
      session_cookie_name,
      session_idle_timeout_secs,
      seed_db,
    })
  }

  pub fn server_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;
  use std::collections::HashMap;

  fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    move |key| vars.get(key).cloned()
  }

  #[test]
  fn defaults_apply_when_only_database_url_is_set() {
    let cfg = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://localhost/wingtip")])).unwrap();
    assert_eq!(cfg.server_address(), "127.0.0.1:8080");
    assert_eq!(cfg.database_max_connections, 5);
    assert_eq!(cfg.session_cookie_name, "wingtip_session");
    assert_eq!(cfg.session_idle_timeout_secs, 1800);
    assert!(!cfg.seed_db);
  }

  #[test]
  fn invalid_idle_timeout_is_rejected() {
    let err = AppConfig::from_lookup(lookup_from(&[
      ("DATABASE_URL", "postgres://x"),
      ("SESSION_IDLE_TIMEOUT_SECS", "-5"),
    ]))
    .unwrap_err();
    assert!(matches!(err, AppError::Config(m) if m.contains("SESSION_IDLE_TIMEOUT_SECS")));
  }

  #[test]
  fn missing_database_url_is_a_config_error() {
    let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
    assert!(matches!(err, AppError::Config(m) if m.contains("DATABASE_URL")));
  }

  #[test]
  fn invalid_port_is_rejected() {
    let err = AppConfig::from_lookup(lookup_from(&[("DATABASE_URL", "postgres://x"), ("SERVER_PORT", "eighty")]))
      .unwrap_err();
    assert!(matches!(err, AppError::Config(m) if m.contains("SERVER_PORT")));
  }

  #[test]
  #[serial]
  fn from_env_reads_process_environment() {
    env::set_var("DATABASE_URL", "postgres://localhost/from_env");
    env::set_var("SEED_DB", "true");
    let cfg = AppConfig::from_env().unwrap();
    env::remove_var("SEED_DB");
    assert_eq!(cfg.database_url, "postgres://localhost/from_env");
    assert!(cfg.seed_db);
  }
}
