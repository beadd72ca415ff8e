use serde::Deserialize;

use foodgram_auth_types::token::DEFAULT_TOKEN_TTL;
use foodgram_core::config::Config;

/// API service configuration, read from the environment.
#[derive(Debug, Deserialize)]
pub struct ApiConfig {
    /// PostgreSQL connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// HMAC secret for auth tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// HTTP port (default 8000). Env var: `API_PORT`.
    #[serde(default = "default_port")]
    pub api_port: u16,
    /// Token lifetime in seconds (default 7 days). Env var: `TOKEN_TTL_SECS`.
    #[serde(default = "default_token_ttl")]
    pub token_ttl_secs: u64,
    /// Apply pending migrations on startup (default true). Env var: `RUN_MIGRATIONS`.
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

impl Config for ApiConfig {}

fn default_port() -> u16 {
    8000
}

fn default_token_ttl() -> u64 {
    DEFAULT_TOKEN_TTL
}

fn default_run_migrations() -> bool {
    true
}

/// Configuration of the `foodgram-seed` tool: only the database is needed.
#[derive(Debug, Deserialize)]
pub struct SeedConfig {
    /// Env var: `DATABASE_URL`.
    pub database_url: String,
}

impl Config for SeedConfig {}
