//! Service configuration from environment variables

use crate::jwt::JwtConfig;

/// Top-level application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,
    /// Session token configuration
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Create a new AppConfig from environment variables
    ///
    /// # Environment Variables
    /// - `BIND_ADDR`: listen address (default: `0.0.0.0:3000`)
    /// - plus everything `JwtConfig::from_env` reads
    pub fn from_env() -> Self {
        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        AppConfig {
            bind_addr,
            jwt: JwtConfig::from_env(),
        }
    }
}
