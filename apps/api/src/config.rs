use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Only paths and the port are required-with-defaults; the generation API
/// key is optional because requests normally carry their own.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path of the JSON array file holding all product records.
    pub products_file: PathBuf,
    /// Directory the rendered .docx documents are written to.
    pub documents_dir: PathBuf,
    /// Fallback generation-service key used when a request omits `apiKey`.
    pub openai_api_key: Option<String>,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            products_file: std::env::var("PRODUCTS_FILE")
                .unwrap_or_else(|_| "products_data.json".to_string())
                .into(),
            documents_dir: std::env::var("DOCUMENTS_DIR")
                .unwrap_or_else(|_| "Product_Documents".to_string())
                .into(),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
