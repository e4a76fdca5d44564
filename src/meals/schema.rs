//! Meal data shapes and the contract the model's output is checked against.

use std::fmt;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Day {
    Sun,
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
    Sat,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Sun,
        Day::Mon,
        Day::Tue,
        Day::Wed,
        Day::Thu,
        Day::Fri,
        Day::Sat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Day::Sun => "Sun",
            Day::Mon => "Mon",
            Day::Tue => "Tue",
            Day::Wed => "Wed",
            Day::Thu => "Thu",
            Day::Fri => "Fri",
            Day::Sat => "Sat",
        }
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ingredient {
    pub item: String,
    /// Free text such as "2 tbsp" or "a pinch".
    pub quantity: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: String,
    pub day: Day,
    pub name: String,
    pub description: String,
    pub prep_minutes: f64,
    pub cook_minutes: f64,
    pub ingredients: Vec<Ingredient>,
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Meal {
    /// Checks the invariants serde cannot express on its own.
    pub fn validate(&self) -> Result<(), String> {
        for (field, minutes) in [("prepMinutes", self.prep_minutes), ("cookMinutes", self.cook_minutes)] {
            if !minutes.is_finite() || minutes < 0.0 {
                return Err(format!("meal `{}` has invalid {} {}", self.id, field, minutes));
            }
        }
        if self.ingredients.is_empty() {
            return Err(format!("meal `{}` has no ingredients", self.id));
        }
        if self.steps.is_empty() {
            return Err(format!("meal `{}` has no steps", self.id));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchemaViolation {
    #[error("output is not valid JSON: {0}")]
    Json(String),

    #[error("output does not match the meal schema: {0}")]
    Shape(String),

    #[error("meal at index {index} is invalid: {reason}")]
    Invariant { index: usize, reason: String },
}

#[derive(Debug, Deserialize)]
struct MealsEnvelope {
    meals: Vec<Meal>,
}

/// Parses model output into meals, or says why it cannot.
pub fn parse_meals(text: &str) -> Result<Vec<Meal>, SchemaViolation> {
    let envelope: MealsEnvelope = serde_json::from_str(text).map_err(|e| match e.classify() {
        serde_json::error::Category::Data => SchemaViolation::Shape(e.to_string()),
        _ => SchemaViolation::Json(e.to_string()),
    })?;
    validate_meals(&envelope.meals)?;
    Ok(envelope.meals)
}

pub fn validate_meals(meals: &[Meal]) -> Result<(), SchemaViolation> {
    for (index, meal) in meals.iter().enumerate() {
        meal.validate()
            .map_err(|reason| SchemaViolation::Invariant { index, reason })?;
    }
    Ok(())
}

pub const MEAL_INSTRUCTIONS: &str = "You are an expert meal-planning engine. Return ONLY JSON that matches the schema. Be concise but complete. Each meal needs: unique ID, day, name, description, prep/cook minutes, ingredients list, and cooking steps. You may optionally add a 'tags' array with relevant descriptive tags.";

lazy_static! {
    pub static ref MEAL_JSON_SCHEMA: Value = json!({
        "type": "object",
        "properties": {
            "meals": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "id": { "type": "string" },
                        "day": {
                            "type": "string",
                            "enum": Day::ALL.iter().map(|d| d.as_str()).collect::<Vec<_>>()
                        },
                        "name": { "type": "string" },
                        "description": { "type": "string" },
                        "prepMinutes": { "type": "number", "minimum": 0 },
                        "cookMinutes": { "type": "number", "minimum": 0 },
                        "ingredients": {
                            "type": "array",
                            "items": {
                                "type": "object",
                                "properties": {
                                    "item": { "type": "string" },
                                    "quantity": { "type": "string" }
                                },
                                "required": ["item", "quantity"],
                                "additionalProperties": false
                            },
                            "minItems": 1
                        },
                        "steps": {
                            "type": "array",
                            "items": { "type": "string" },
                            "minItems": 1
                        },
                        "tags": {
                            "type": "array",
                            "items": { "type": "string" }
                        }
                    },
                    "required": ["id", "day", "name", "description", "prepMinutes", "cookMinutes", "ingredients", "steps"],
                    "additionalProperties": false
                }
            }
        },
        "required": ["meals"],
        "additionalProperties": false
    });
}
