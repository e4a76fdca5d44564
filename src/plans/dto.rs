use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use super::repo_types::PlanRow;
use super::week::week_range_label;
use crate::meals::schema::Meal;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(with = "iso_date")]
    pub week_start: Date,
    pub week_label: String,
    pub meals: Vec<Meal>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<PlanRow> for Plan {
    fn from(r: PlanRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            week_start: r.week_start,
            week_label: week_range_label(r.week_start),
            meals: r.meals.0,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlanResponse {
    pub plan: Option<Plan>,
}

#[derive(Debug, Deserialize)]
pub struct SavePlanRequest {
    pub meals: Vec<Meal>,
}
