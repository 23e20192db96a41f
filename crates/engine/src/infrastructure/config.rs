//! Process configuration read from the environment.

use anyhow::{Context, Result};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;

/// Allowed CORS origins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorsOrigins {
    Any,
    List(Vec<String>),
}

impl CorsOrigins {
    fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == "*" {
            return Self::Any;
        }
        Self::List(
            raw.split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server_host: String,
    pub server_port: u16,
    pub api_admin_token: String,
    pub api_user_token: String,
    pub cors_allowed_origins: CorsOrigins,
}

impl AppConfig {
    /// Load from process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let server_port = match lookup("SERVER_PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .with_context(|| format!("SERVER_PORT must be a port number, got {:?}", raw))?,
            None => DEFAULT_PORT,
        };
        let api_admin_token = lookup("API_ADMIN_TOKEN")
            .filter(|token| !token.is_empty())
            .context("API_ADMIN_TOKEN must be set")?;
        let api_user_token = lookup("API_USER_TOKEN")
            .filter(|token| !token.is_empty())
            .context("API_USER_TOKEN must be set")?;
        let cors_allowed_origins = lookup("CORS_ALLOWED_ORIGINS")
            .map(|raw| CorsOrigins::parse(&raw))
            .unwrap_or(CorsOrigins::Any);

        Ok(Self {
            server_host,
            server_port,
            api_admin_token,
            api_user_token,
            cors_allowed_origins,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
