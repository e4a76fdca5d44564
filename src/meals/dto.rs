use serde::{Deserialize, Serialize};

use super::history::ConversationHistory;
use super::schema::Meal;

#[derive(Debug, Deserialize)]
pub struct GenerateMealsRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub history: Option<ConversationHistory>,
}

#[derive(Debug, Serialize)]
pub struct GenerateMealsResponse {
    pub meals: Vec<Meal>,
    pub history: ConversationHistory,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RerollMealRequest {
    #[serde(default)]
    pub original_prompt: Option<String>,
    #[serde(default)]
    pub day_to_reroll: Option<String>,
    #[serde(default)]
    pub existing_meal_names: Option<Vec<String>>,
}

#[derive(Debug, Serialize)]
pub struct RerollMealResponse {
    pub meal: Meal,
}

#[derive(Debug, Serialize)]
pub struct MealPocResponse {
    pub message: String,
}
