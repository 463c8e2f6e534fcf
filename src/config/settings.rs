//! Application settings loaded from environment variables.

use std::env;

use super::constants::{
    DEFAULT_AUDITOR, DEFAULT_DATABASE_URL, DEFAULT_MAX_CONNECTIONS, DEFAULT_SERVER_HOST,
    DEFAULT_SERVER_PORT,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    /// Log every SQL statement issued by the ORM
    pub sql_logging: bool,
    pub server_host: String,
    pub server_port: u16,
    /// Author written into `created_by` / `last_modified_by`
    pub auditor: String,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &"[REDACTED]")
            .field("max_connections", &self.max_connections)
            .field("sql_logging", &self.sql_logging)
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("auditor", &self.auditor)
            .finish()
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string()),
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_CONNECTIONS),
            sql_logging: env::var("SQL_LOGGING")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| DEFAULT_SERVER_HOST.to_string()),
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SERVER_PORT),
            auditor: env::var("AUDITOR").unwrap_or_else(|_| DEFAULT_AUDITOR.to_string()),
        }
    }

    /// Configuration for a private in-memory SQLite database.
    ///
    /// A single pooled connection keeps every query on the same database.
    pub fn in_memory() -> Self {
        Self {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 1,
            sql_logging: false,
            server_host: DEFAULT_SERVER_HOST.to_string(),
            server_port: DEFAULT_SERVER_PORT,
            auditor: DEFAULT_AUDITOR.to_string(),
        }
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
