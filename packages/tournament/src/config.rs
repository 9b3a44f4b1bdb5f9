use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;

pub const DEVELOPMENT_BACKEND_URL: &str = "http://localhost:5053";
pub const PRODUCTION_BACKEND_URL: &str = "https://be-tournament.kuma.id.vn/";

/// Deployment stage selecting the backend address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Development,
    Production,
}

impl Stage {
    /// Exactly `development` selects the local backend; anything else is
    /// production.
    pub fn parse(value: &str) -> Self {
        match value {
            "development" => Stage::Development,
            _ => Stage::Production,
        }
    }

    pub fn backend_url(&self) -> &'static str {
        match self {
            Stage::Development => DEVELOPMENT_BACKEND_URL,
            Stage::Production => PRODUCTION_BACKEND_URL,
        }
    }
}

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub stage: Stage,
    pub backend_url: String,
    pub user_email: Option<String>,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        let stage = Stage::parse(
            &env::var("TOURNAMENT_STAGE").unwrap_or_else(|_| "production".to_string()),
        );

        Ok(Self {
            stage,
            backend_url: env::var("TOURNAMENT_BACKEND_URL")
                .ok()
                .filter(|url| !url.trim().is_empty())
                .unwrap_or_else(|| stage.backend_url().to_string()),
            user_email: env::var("TOURNAMENT_USER_EMAIL").ok(),
        })
    }

    /// Email of the submitting user; required for create and update.
    pub fn require_user_email(&self) -> Result<&str> {
        self.user_email
            .as_deref()
            .filter(|email| !email.is_empty())
            .context("TOURNAMENT_USER_EMAIL must be set")
    }
}
