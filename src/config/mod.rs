use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

/// Errors raised while assembling configuration from the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub database: String,
    pub max_connections: u32,
    /// Seconds a request may wait for a pooled connection
    pub connection_timeout: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub rate_limit_requests: u32,
    pub rate_limit_window_secs: u64,
    pub max_request_size_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    pub api_key_header: String,
    /// Header set by the fronting proxy with the real client address
    pub client_ip_header: String,
    pub expose_backend_errors: bool,
    pub enable_cors: bool,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            _ => Environment::Development,
        };

        let config = match environment {
            Environment::Production => Self::production(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()?;

        config.validate()?;
        Ok(config)
    }

    fn with_env_overrides(mut self) -> Result<Self, ConfigError> {
        // Server
        if let Ok(v) = env::var("HOST") {
            self.server.host = v;
        }
        if let Ok(v) = env::var("PORT") {
            self.server.port = parse("PORT", &v)?;
        }

        // Database
        if let Ok(v) = env::var("DB_HOST") {
            self.database.host = v;
        }
        if let Ok(v) = env::var("DB_PORT") {
            self.database.port = parse("DB_PORT", &v)?;
        }
        if let Ok(v) = env::var("DB_USERNAME") {
            self.database.username = v;
        }
        if let Ok(v) = env::var("DB_PASSWORD") {
            self.database.password = v;
        }
        if let Ok(v) = env::var("DB_DATABASE") {
            self.database.database = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = parse("DATABASE_MAX_CONNECTIONS", &v)?;
        }
        if let Ok(v) = env::var("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = parse("DATABASE_CONNECTION_TIMEOUT", &v)?;
        }

        // API
        if let Ok(v) = env::var("API_RATE_LIMIT_REQUESTS") {
            self.api.rate_limit_requests = parse("API_RATE_LIMIT_REQUESTS", &v)?;
        }
        if let Ok(v) = env::var("API_RATE_LIMIT_WINDOW_SECS") {
            self.api.rate_limit_window_secs = parse("API_RATE_LIMIT_WINDOW_SECS", &v)?;
        }
        if let Ok(v) = env::var("API_MAX_REQUEST_SIZE_BYTES") {
            self.api.max_request_size_bytes = parse("API_MAX_REQUEST_SIZE_BYTES", &v)?;
        }

        // Security
        if let Ok(v) = env::var("API_KEY") {
            self.security.api_key = v;
        }
        if let Ok(v) = env::var("API_KEY_HEADER") {
            self.security.api_key_header = v.to_ascii_lowercase();
        }
        if let Ok(v) = env::var("CLIENT_IP_HEADER") {
            self.security.client_ip_header = v.to_ascii_lowercase();
        }
        if let Ok(v) = env::var("SECURITY_EXPOSE_BACKEND_ERRORS") {
            self.security.expose_backend_errors = parse("SECURITY_EXPOSE_BACKEND_ERRORS", &v)?;
        }
        if let Ok(v) = env::var("SECURITY_ENABLE_CORS") {
            self.security.enable_cors = parse("SECURITY_ENABLE_CORS", &v)?;
        }
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        Ok(self)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.security.api_key.is_empty() {
            return Err(ConfigError::Missing("API_KEY"));
        }
        if self.database.host.is_empty() {
            return Err(ConfigError::Missing("DB_HOST"));
        }
        if self.database.database.is_empty() {
            return Err(ConfigError::Missing("DB_DATABASE"));
        }
        if self.api.rate_limit_requests == 0 {
            return Err(ConfigError::Invalid {
                key: "API_RATE_LIMIT_REQUESTS",
                value: "0".to_string(),
            });
        }
        if self.api.rate_limit_window_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "API_RATE_LIMIT_WINDOW_SECS",
                value: "0".to_string(),
            });
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                value: "0".to_string(),
            });
        }
        Ok(())
    }

    pub fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            database: DatabaseConfig {
                host: "localhost".to_string(),
                port: 3306,
                username: "root".to_string(),
                password: String::new(),
                database: "game".to_string(),
                max_connections: 5,
                connection_timeout: 30,
            },
            api: ApiConfig {
                rate_limit_requests: 10,
                rate_limit_window_secs: 60,
                max_request_size_bytes: 100 * 1024, // 100KB
            },
            security: SecurityConfig {
                api_key: String::new(),
                api_key_header: "x-api-key".to_string(),
                client_ip_header: "cf-connecting-ip".to_string(),
                expose_backend_errors: true,
                enable_cors: false,
                cors_origins: vec!["http://localhost:5173".to_string()],
            },
        }
    }

    pub fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                connection_timeout: 10,
                ..Self::development().database
            },
            security: SecurityConfig {
                expose_backend_errors: false,
                cors_origins: Vec::new(),
                ..Self::development().security
            },
            ..Self::development()
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid {
        key,
        value: value.to_string(),
    })
}
