//! Environment-sourced configuration, read once at startup.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub storage_dir: PathBuf,
    pub max_file_size_mb: usize,
    pub retention_minutes: u64,
    pub cors_origins: Vec<String>,
    pub production: bool,
}

impl Config {
    pub fn from_env() -> Self {
        let cors_origins = std::env::var("CORS_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect();

        Self {
            port: env_or("PORT", 8000),
            storage_dir: PathBuf::from(
                std::env::var("STORAGE_DIR").unwrap_or_else(|_| "uploads".into()),
            ),
            max_file_size_mb: env_or("MAX_FILE_SIZE_MB", 50),
            retention_minutes: env_or("FILE_RETENTION_MINUTES", 30),
            cors_origins,
            production: std::env::var("ENVIRONMENT")
                .map(|e| e.eq_ignore_ascii_case("production"))
                .unwrap_or(false),
        }
    }

    pub fn max_body_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_minutes * 60)
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
