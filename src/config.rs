use serde::Deserialize;
use std::env;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub environment: String,

    // Model serving
    pub model_server_url: String,

    // Text generation
    pub groq_api_key: Option<String>,
    pub groq_api_url: String,

    // Commodity price feed
    pub market_api_url: String,
    pub market_api_key: String,

    // CORS
    pub cors_allowed_origins: String,
}

const DEFAULT_GROQ_API_URL: &str = "https://api.groq.com/openai/v1/chat/completions";
const DEFAULT_MARKET_API_URL: &str =
    "https://api.data.gov.in/resource/9ef84268-d588-465a-a308-a864a43d0070";
// data.gov.in's published sample key; real deployments set MARKET_API_KEY.
const DEFAULT_MARKET_API_KEY: &str =
    "579b464db66ec23bdd000001cdd3946e44ce4aad7209ff7b23ac571b";

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            model_server_url: env::var("MODEL_SERVER_URL")?,

            groq_api_key: env::var("GROQ_API_KEY").ok(),
            groq_api_url: env::var("GROQ_API_URL")
                .unwrap_or_else(|_| DEFAULT_GROQ_API_URL.to_string()),

            market_api_url: env::var("MARKET_API_URL")
                .unwrap_or_else(|_| DEFAULT_MARKET_API_URL.to_string()),
            market_api_key: env::var("MARKET_API_KEY")
                .unwrap_or_else(|_| DEFAULT_MARKET_API_KEY.to_string()),

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.model_server_url.trim().is_empty() {
            anyhow::bail!("MODEL_SERVER_URL is empty");
        }
        if self.market_api_url.trim().is_empty() {
            anyhow::bail!("MARKET_API_URL is empty");
        }
        if self.market_api_key.trim().is_empty() {
            anyhow::bail!("MARKET_API_KEY is empty");
        }

        if self.groq_api_key.is_none() {
            tracing::warn!("GROQ_API_KEY not set; advisory pipeline will serve canned fallbacks");
        }
        if self.market_api_key == DEFAULT_MARKET_API_KEY {
            tracing::warn!("Using the public sample market API key");
        }
        if self.cors_allowed_origins.trim().is_empty() {
            tracing::warn!("CORS_ALLOWED_ORIGINS is empty; requests may be blocked");
        }

        Ok(())
    }
}
