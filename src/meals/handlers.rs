use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tracing::{error, instrument, warn};

use super::dto::{
    GenerateMealsRequest, GenerateMealsResponse, MealPocResponse, RerollMealRequest,
    RerollMealResponse,
};
use crate::{error::ApiError, extract::JsonBody, llm::GenerationRequest, state::AppState};

pub const MIN_PROMPT_CHARS: usize = 10;
pub const MAX_PROMPT_CHARS: usize = 500;

const POC_INSTRUCTIONS: &str = "You are a meal planning assistant that suggests thoughtful, creative meals based on the specific needs of the user";
const POC_PROMPT: &str = "Suggest 4 easy dinner meals for a family of 2 adults and 1 toddler. Moderately healthy, but primary emphasis on very fast prep time for family lacking time to cook.";

pub fn meal_routes() -> Router<AppState> {
    Router::new()
        .route("/generate-meals", post(generate_meals))
        .route("/reroll-meal", post(reroll_meal))
        .route("/meal-poc", get(meal_poc))
}

/// Returns the trimmed prompt when it is present and 10..=500 characters long.
pub(crate) fn validate_prompt(prompt: Option<&str>) -> Result<&str, ApiError> {
    let prompt = prompt
        .filter(|p| !p.is_empty())
        .ok_or_else(|| ApiError::InvalidInput("Prompt is required".into()))?
        .trim();
    let chars = prompt.chars().count();
    if chars < MIN_PROMPT_CHARS {
        return Err(ApiError::InvalidInput(format!(
            "Prompt must be at least {} characters long",
            MIN_PROMPT_CHARS
        )));
    }
    if chars > MAX_PROMPT_CHARS {
        return Err(ApiError::InvalidInput(format!(
            "Prompt must be {} characters or less",
            MAX_PROMPT_CHARS
        )));
    }
    Ok(prompt)
}

#[instrument(skip(state, body))]
pub async fn generate_meals(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<GenerateMealsRequest>,
) -> Result<Json<GenerateMealsResponse>, ApiError> {
    let prompt = validate_prompt(body.prompt.as_deref()).inspect_err(|e| {
        warn!(error = %e, "invalid prompt");
    })?;
    let planner = state.planner()?;

    let generated = planner
        .generate(prompt, body.history.unwrap_or_default())
        .await?;

    Ok(Json(GenerateMealsResponse {
        meals: generated.meals,
        history: generated.history,
    }))
}

#[instrument(skip(state, body))]
pub async fn reroll_meal(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RerollMealRequest>,
) -> Result<Json<RerollMealResponse>, ApiError> {
    let original_prompt = body
        .original_prompt
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .ok_or_else(|| ApiError::InvalidInput("Original prompt is required".into()))?;
    let day = body
        .day_to_reroll
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ApiError::InvalidInput("Day to reroll is required".into()))?;
    let existing = body
        .existing_meal_names
        .as_deref()
        .ok_or_else(|| ApiError::InvalidInput("Existing meal names must be an array".into()))?;
    let planner = state.planner()?;

    let rerolled = planner.reroll(original_prompt, day, existing).await?;
    Ok(Json(RerollMealResponse {
        meal: rerolled.meal,
    }))
}

/// Free-text smoke test of the generation service with a fixed prompt.
#[instrument(skip(state))]
pub async fn meal_poc(State(state): State<AppState>) -> Result<Json<MealPocResponse>, ApiError> {
    let generator = state.generator()?;
    let request = GenerationRequest {
        instructions: POC_INSTRUCTIONS.to_string(),
        input: POC_PROMPT.to_string(),
        format: None,
    };
    let message = generator
        .generate(request)
        .await
        .map_err(|e| {
            error!(error = %e, "meal-poc generation failed");
            ApiError::Internal("Failed to generate meal idea".into())
        })?
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| "No response generated".to_string());
    Ok(Json(MealPocResponse { message }))
}
