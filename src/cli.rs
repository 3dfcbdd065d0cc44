//! CLI argument parsing, validation, and startup helpers.

use crate::ServerConfig;
use crate::gate::{DEFAULT_LOGIN_PATH, DEFAULT_NOT_FOUND_PATH, GateConfig};
use crate::routes::RouteTable;
use clap::Parser;

#[derive(clap::ValueEnum, Clone, Debug, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
    Compact,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "examdesk",
    about = "Exam dashboard front server with role-gated routes"
)]
pub struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3000", env = "EXAMDESK_PORT")]
    pub port: u16,

    /// Page unauthenticated users are sent to
    #[arg(long, default_value = DEFAULT_LOGIN_PATH, value_parser = validate_page_path)]
    pub login_path: String,

    /// Page users are sent to when their role may not open a path
    #[arg(long, default_value = DEFAULT_NOT_FOUND_PATH, value_parser = validate_page_path)]
    pub not_found_path: String,

    /// Log output format
    #[arg(short, long, default_value = "pretty")]
    pub log_format: LogFormat,
}

fn validate_page_path(s: &str) -> Result<String, String> {
    if !s.starts_with('/') {
        return Err(format!("Path must start with '/': {}", s));
    }

    if s == "/" {
        return Err("Path must not be the site root".to_string());
    }

    if s.ends_with('/') {
        return Err(format!("Path must not end with '/': {}", s));
    }

    if s.chars().any(|c| !c.is_ascii() || c.is_whitespace()) {
        return Err(format!("Path contains invalid characters: {}", s));
    }

    Ok(s.to_string())
}

/// Initialize logging based on the specified format.
pub fn init_logging(format: &LogFormat) {
    match format {
        LogFormat::Pretty => tracing_subscriber::fmt::init(),
        LogFormat::Json => tracing_subscriber::fmt().json().init(),
        LogFormat::Compact => tracing_subscriber::fmt().compact().init(),
    }
}

/// Build ServerConfig from validated arguments.
///
/// Fails if a redirect target would itself be gated or if the two targets
/// collide.
pub fn build_config(login_path: &str, not_found_path: &str) -> Result<ServerConfig, String> {
    if login_path == not_found_path {
        return Err(format!(
            "Login and not-found pages must differ: {}",
            login_path
        ));
    }

    let gate = GateConfig::new(RouteTable::dashboard(), login_path, not_found_path);
    for target in [login_path, not_found_path] {
        if gate.is_gated(target) {
            return Err(format!("Redirect target is behind the gate: {}", target));
        }
    }

    Ok(ServerConfig { gate })
}
