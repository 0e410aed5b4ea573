//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use crate::db::Database;
use clap::Parser;
use tracing::{error, info};

const MIN_SESSION_SECRET_LENGTH: usize = 32;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "Gatehouse",
    about = "Session-backed authentication service with cookie and bearer-token clients"
)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "7320")]
    pub port: u16,

    /// Path to SQLite database file
    #[arg(short, long, default_value = "gatehouse.db")]
    pub database: String,

    /// Session lifetime in seconds
    #[arg(long, default_value = "2592000")]
    pub session_ttl: u64,

    /// Fraction of the session lifetime remaining below which a presented
    /// session is replaced by a fresh one
    #[arg(long, default_value = "0.5", value_parser = validate_renewal_fraction)]
    pub renewal_fraction: f64,

    /// Path to file containing the session signing secret. Prefer using the
    /// SESSION_SECRET env var instead
    #[arg(long)]
    pub secret_file: Option<String>,

    /// Mark session cookies Secure (requires serving over HTTPS)
    #[arg(long)]
    pub production: bool,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

fn validate_renewal_fraction(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("Not a number: {}", s))?;

    if !(value > 0.0 && value <= 1.0) {
        return Err(format!(
            "Renewal fraction must be in (0, 1], got: {}",
            value
        ));
    }

    Ok(value)
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Load the session signing secret from environment variable or file.
/// Returns None and logs an error if the secret cannot be loaded.
pub fn load_session_secret(secret_file: Option<&str>) -> Option<String> {
    let secret = if let Ok(secret) = std::env::var("SESSION_SECRET") {
        // Clear the environment variable to prevent leaking
        // SAFETY: We're single-threaded at this point during startup,
        // and no other code is reading this environment variable.
        unsafe { std::env::remove_var("SESSION_SECRET") };
        secret
    } else if let Some(path) = secret_file {
        match std::fs::read_to_string(path) {
            Ok(content) => content.trim().to_string(),
            Err(e) => {
                error!(path = %path, error = %e, "Failed to read session secret file");
                return None;
            }
        }
    } else {
        error!(
            "Session secret is required. Set SESSION_SECRET environment variable (recommended) or use --secret-file"
        );
        return None;
    };

    if secret.len() < MIN_SESSION_SECRET_LENGTH {
        error!(
            "Session secret is shorter than {} characters. Use a longer secret",
            MIN_SESSION_SECRET_LENGTH
        );
        return None;
    }

    Some(secret)
}

/// Build ServerConfig from validated arguments.
pub fn build_config(
    db: Database,
    session_secret: String,
    session_ttl_secs: u64,
    renewal_fraction: f64,
    production: bool,
) -> ServerConfig {
    ServerConfig {
        db,
        signing_secret: session_secret.into_bytes(),
        session_ttl_secs,
        renewal_fraction,
        secure_cookies: production,
    }
}

/// Open the database, logging errors if it fails.
pub async fn open_database(path: &str) -> Option<Database> {
    match Database::open(path).await {
        Ok(db) => {
            info!(path = %path, "Database opened");
            Some(db)
        }
        Err(e) => {
            error!(path = %path, error = %e, "Failed to open database");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_renewal_fraction_bounds() {
        assert!(validate_renewal_fraction("0.5").is_ok());
        assert!(validate_renewal_fraction("1").is_ok());
        assert!(validate_renewal_fraction("0").is_err());
        assert!(validate_renewal_fraction("1.5").is_err());
        assert!(validate_renewal_fraction("half").is_err());
    }
}
