use crate::config::AppConfig;
use crate::error::{ApiError, PersistenceError};
use crate::llm::{OpenAiClient, TextGenerator};
use crate::meals::services::MealPlanner;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: Option<PgPool>,
    pub config: Arc<AppConfig>,
    pub generator: Option<Arc<dyn TextGenerator>>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let generator = match config.openai.api_key.as_deref() {
            Some(key) => {
                Some(Arc::new(OpenAiClient::new(&config.openai, key)?) as Arc<dyn TextGenerator>)
            }
            None => {
                tracing::warn!("OPENAI_API_KEY not set; generation endpoints will fail");
                None
            }
        };

        let db = crate::db::connect(&config).await?;

        Ok(Self {
            db,
            config,
            generator,
        })
    }

    pub fn generator(&self) -> Result<Arc<dyn TextGenerator>, ApiError> {
        self.generator
            .clone()
            .ok_or_else(|| ApiError::Configuration("OpenAI API key not configured".into()))
    }

    pub fn planner(&self) -> Result<MealPlanner, ApiError> {
        self.generator().map(MealPlanner::new)
    }

    pub fn db(&self) -> Result<&PgPool, PersistenceError> {
        self.db.as_ref().ok_or_else(PersistenceError::not_configured)
    }
}

#[cfg(test)]
impl AppState {
    pub const TEST_JWT_SECRET: &'static str = "test-secret";

    /// State with no API key and no database.
    pub fn fake() -> Self {
        use crate::config::{JwtConfig, OpenAiConfig};
        use std::time::Duration;

        let config = Arc::new(AppConfig {
            openai: OpenAiConfig {
                api_key: None,
                model: "test-model".into(),
                base_url: "http://fake.local".into(),
                timeout: Duration::from_secs(1),
            },
            database_url: None,
            jwt: Some(JwtConfig {
                secret: Self::TEST_JWT_SECRET.into(),
                audience: "authenticated".into(),
                issuer: None,
            }),
            static_dir: None,
        });

        Self {
            db: None,
            config,
            generator: None,
        }
    }

    pub fn fake_with_generator(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
            ..Self::fake()
        }
    }
}
