//! Command-line and environment configuration for the server binary.

use clap::Parser;

/// One year.
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "ukg-mock-server",
    about = "Mock UKG REST API and union entitlements service",
    version
)]
pub struct ServerConfig {
    /// Interface both listeners bind to
    #[arg(long, env = "HOST", default_value = "127.0.0.1")]
    pub host: String,
    /// Port for the UKG API
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,
    /// Port for the union entitlements service
    #[arg(long, env = "ENTITLEMENTS_PORT", default_value_t = 8081)]
    pub entitlements_port: u16,
    /// Lifetime of issued bearer tokens, in seconds (1 to 31536000)
    #[arg(
        long,
        env = "TOKEN_TTL_SECS",
        default_value_t = 3600,
        value_parser = clap::value_parser!(i64).range(1..=MAX_TOKEN_TTL_SECS)
    )]
    pub token_ttl_secs: i64,
    /// Load the sample data set at startup
    #[arg(long, env = "SEED")]
    pub seed: bool,
    /// Log filter used when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.token_ttl_secs)
    }
}
