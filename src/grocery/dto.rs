use serde::{Deserialize, Serialize};

use super::services::GroceryItem;
use crate::meals::schema::Meal;

#[derive(Debug, Deserialize)]
pub struct GroceryListRequest {
    #[serde(default)]
    pub meals: Vec<Meal>,
}

#[derive(Debug, Serialize)]
pub struct GroceryListResponse {
    pub items: Vec<GroceryItem>,
}
