use anyhow::{Context, Result};

pub const DEFAULT_TRANSLATION_API_BASE: &str = "https://api-inference.huggingface.co";
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["http://localhost:3000", "https://your-frontend-domain.vercel.app"];
pub const DEFAULT_PORT: u16 = 8000;

/// Runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Enables the hosted translation model; without it only the phrase dictionary is used.
    pub huggingface_api_token: Option<String>,
    pub translation_api_base: String,
    pub allowed_origins: Vec<String>,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let allowed_origins = match lookup("ALLOWED_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        let port = match lookup("PORT") {
            Some(p) => p.parse::<u16>().context("PORT must be a valid port number")?,
            None => DEFAULT_PORT,
        };

        Ok(Config {
            huggingface_api_token: lookup("HUGGINGFACE_API_TOKEN").filter(|t| !t.trim().is_empty()),
            translation_api_base: lookup("TRANSLATION_API_BASE")
                .unwrap_or_else(|| DEFAULT_TRANSLATION_API_BASE.to_string()),
            allowed_origins,
            port,
        })
    }
}
