// src/config.rs

use dotenvy::dotenv;
use std::env;

/// Application configuration, built once at startup and carried in
/// `AppState`. Nothing reads the environment after this point.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Origins allowed by the CORS layer.
    pub cors_origins: Vec<String>,
    pub rust_log: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://mentoroid.db".to_string());

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        Self {
            database_url,
            cors_origins,
            rust_log,
            port,
        }
    }
}
