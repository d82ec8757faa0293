//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `BISTRO_HOST` - Bind address (default: 127.0.0.1)
//! - `BISTRO_PORT` - Listen port (default: 3000)
//! - `BISTRO_ORDER_ENDPOINT` - Order submission URL
//!   (default: <https://httpbin.org/post>)
//! - `BISTRO_CATALOG_PATH` - Product catalog JSON file
//!   (default: the catalog bundled into the binary)

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// URL that receives the form-encoded order submission
    pub order_endpoint: String,
    /// Optional path to a product catalog JSON file
    pub catalog_path: Option<PathBuf>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("BISTRO_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("BISTRO_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("BISTRO_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("BISTRO_PORT".to_string(), e.to_string()))?;
        let order_endpoint = get_env_or_default("BISTRO_ORDER_ENDPOINT", "https://httpbin.org/post");
        let catalog_path = get_optional_env("BISTRO_CATALOG_PATH").map(PathBuf::from);

        Ok(Self {
            host,
            port,
            order_endpoint,
            catalog_path,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
