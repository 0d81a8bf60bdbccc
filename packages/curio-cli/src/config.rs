//! CLI configuration from environment variables.

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Runtime configuration for the `curio` binary.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key.
    pub api_key: String,

    /// Model override (default: the library's default model).
    pub model: Option<String>,

    /// Path to the JSON library file.
    pub library_path: PathBuf,

    /// User id items are saved under.
    pub user_id: String,
}

impl Config {
    /// Load configuration from the environment (after `.env`, if present).
    pub fn from_env() -> Result<Self> {
        // A missing .env file is fine; explicit env vars still apply.
        dotenvy::dotenv().ok();

        let api_key = std::env::var("GEMINI_API_KEY")
            .context("GEMINI_API_KEY not set (add it to the environment or a .env file)")?;

        let model = std::env::var("CURIO_MODEL").ok().filter(|m| !m.is_empty());

        let library_path = std::env::var("CURIO_LIBRARY")
            .map(PathBuf::from)
            .unwrap_or_else(|_| default_library_path());

        let user_id = std::env::var("CURIO_USER").unwrap_or_else(|_| "local".to_string());

        Ok(Self {
            api_key,
            model,
            library_path,
            user_id,
        })
    }
}

fn default_library_path() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".curio")
        .join("library.json")
}
