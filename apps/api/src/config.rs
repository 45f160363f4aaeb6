use std::path::PathBuf;

use anyhow::{Context, Result};

const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024; // 16 MiB

/// Application configuration loaded from environment variables.
/// Every knob has a local-development default.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub upload_dir: PathBuf,
    pub data_file: PathBuf,
    pub max_upload_bytes: usize,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            upload_dir: env_path("UPLOAD_DIR", "data/uploads"),
            data_file: env_path("DATA_FILE", "data/resumes.json"),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .map(|v| v.parse::<usize>())
                .unwrap_or(Ok(DEFAULT_MAX_UPLOAD_BYTES))
                .context("MAX_UPLOAD_BYTES must be a byte count")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn env_path(key: &str, default: &str) -> PathBuf {
    std::env::var(key).unwrap_or_else(|_| default.to_string()).into()
}
