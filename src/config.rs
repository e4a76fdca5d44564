use std::time::Duration;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub audience: String,
    pub issuer: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai: OpenAiConfig,
    pub database_url: Option<String>,
    pub jwt: Option<JwtConfig>,
    pub static_dir: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let openai = OpenAiConfig {
            api_key: non_empty_var("OPENAI_API_KEY"),
            model: std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.into()),
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_BASE_URL.into()),
            timeout: Duration::from_secs(
                std::env::var("OPENAI_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(DEFAULT_OPENAI_TIMEOUT_SECS),
            ),
        };
        let jwt = non_empty_var("SUPABASE_JWT_SECRET").map(|secret| JwtConfig {
            secret,
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "authenticated".into()),
            issuer: non_empty_var("JWT_ISSUER"),
        });
        Ok(Self {
            openai,
            database_url: non_empty_var("DATABASE_URL"),
            jwt,
            static_dir: non_empty_var("STATIC_DIR"),
        })
    }

    /// Persistence is optional: a missing or placeholder database url turns
    /// every plan endpoint off.
    pub fn is_persistence_configured(&self) -> bool {
        self.database_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty() && !url.contains("placeholder"))
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
