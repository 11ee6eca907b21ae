//! Client configuration

use clap::{Args, Parser, ValueEnum};

/// Marquee storefront client configuration
#[derive(Debug, Parser)]
#[command(name = "marquee", about = "Cinema ticketing storefront client", long_about = None)]
pub struct ClientConfig {
    /// Backend API settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

/// Backend REST API settings.
#[derive(Debug, Args)]
pub struct ApiConfig {
    /// Base path of the backend REST API
    #[arg(long, env = "MARQUEE_API_BASE_URL", default_value = "http://localhost:8080/api")]
    pub base_url: String,

    /// Bearer token for role-gated endpoints
    #[arg(long, env = "MARQUEE_API_TOKEN")]
    pub api_token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "MARQUEE_REQUEST_TIMEOUT_SECS", default_value = "10")]
    pub request_timeout_secs: u64,
}

/// Logging output settings.
#[derive(Debug, Args)]
pub struct LoggingConfig {
    /// Log level filter
    #[arg(long, env = "MARQUEE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "MARQUEE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log output format.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable single-line output.
    Compact,

    /// Structured JSON output.
    Json,
}
