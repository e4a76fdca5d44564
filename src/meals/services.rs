use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, instrument, warn};

use super::history::ConversationHistory;
use super::schema::{parse_meals, Meal, MEAL_INSTRUCTIONS, MEAL_JSON_SCHEMA};
use crate::error::GenerationError;
use crate::llm::{GenerationRequest, TextGenerator};

pub const RETRY_PREFIX: &str = "**Fix the JSON so it matches the schema exactly.** ";

/// A generation gets one normal attempt and at most one retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    First,
    Retry,
}

impl Attempt {
    fn prompt(self, prompt: &str) -> String {
        match self {
            Attempt::First => prompt.to_string(),
            Attempt::Retry => format!("{}{}", RETRY_PREFIX, prompt),
        }
    }
}

#[derive(Debug)]
pub struct Generated {
    pub meals: Vec<Meal>,
    pub history: ConversationHistory,
}

#[derive(Debug)]
pub struct Rerolled {
    pub meal: Meal,
    /// False when no returned meal was for the requested day and the first
    /// one was used instead.
    pub day_matched: bool,
}

#[derive(Clone)]
pub struct MealPlanner {
    generator: Arc<dyn TextGenerator>,
}

impl MealPlanner {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Turns a prompt plus the session's history into validated meals and the
    /// updated history.
    #[instrument(skip(self, prompt, history), fields(history_len = history.len()))]
    pub async fn generate(
        &self,
        prompt: &str,
        mut history: ConversationHistory,
    ) -> Result<Generated, GenerationError> {
        let prompt = prompt.trim();
        let started = Instant::now();
        let mut attempt = Attempt::First;

        let (meals, output) = loop {
            let request = GenerationRequest {
                instructions: MEAL_INSTRUCTIONS.to_string(),
                input: history.render_input(&attempt.prompt(prompt)),
                format: Some(MEAL_JSON_SCHEMA.clone()),
            };
            let output = self
                .generator
                .generate(request)
                .await?
                .filter(|text| !text.is_empty())
                .ok_or(GenerationError::NoOutput)?;

            match (parse_meals(&output), attempt) {
                (Ok(meals), _) => break (meals, output),
                (Err(violation), Attempt::First) => {
                    warn!(error = %violation, "model output rejected; retrying with schema fix prompt");
                    attempt = Attempt::Retry;
                }
                (Err(violation), Attempt::Retry) => {
                    error!(error = %violation, "model output rejected after retry");
                    return Err(GenerationError::InvalidOutput(violation));
                }
            }
        };

        history.record_exchange(prompt, &output);
        info!(
            meals = meals.len(),
            retried = attempt == Attempt::Retry,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "meals generated"
        );
        Ok(Generated { meals, history })
    }

    /// Asks for one replacement meal for `day`, steering away from the meals
    /// already in the plan.
    #[instrument(skip(self, original_prompt, existing_meal_names))]
    pub async fn reroll(
        &self,
        original_prompt: &str,
        day: &str,
        existing_meal_names: &[String],
    ) -> Result<Rerolled, GenerationError> {
        let prompt = reroll_prompt(original_prompt, day, existing_meal_names);
        let generated = self.generate(&prompt, ConversationHistory::default()).await?;
        select_rerolled(generated.meals, day)
    }
}

pub fn reroll_prompt(original_prompt: &str, day: &str, existing_meal_names: &[String]) -> String {
    format!(
        "Replace the {day} meal with ONE different meal suggestion. Original request: \"{original_prompt}\". Avoid duplicating these existing meals: {}. Return exactly one meal for {day}.",
        existing_meal_names.join(", ")
    )
}

/// Picks the meal for `day`, falling back to the first meal when the model
/// answered for a different day.
pub fn select_rerolled(meals: Vec<Meal>, day: &str) -> Result<Rerolled, GenerationError> {
    let matched = meals.iter().position(|m| m.day.as_str() == day);
    let day_matched = matched.is_some();
    let meal = meals
        .into_iter()
        .nth(matched.unwrap_or(0))
        .ok_or(GenerationError::NoMealGenerated)?;
    if !day_matched {
        warn!(
            requested_day = %day,
            returned_day = %meal.day,
            meal_id = %meal.id,
            "no rerolled meal for requested day; using first returned meal"
        );
    }
    Ok(Rerolled { meal, day_matched })
}
