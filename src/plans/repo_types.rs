use sqlx::{types::Json, FromRow};
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::meals::schema::Meal;

#[derive(Debug, FromRow)]
pub struct PlanRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub week_start: Date,
    pub meals: Json<Vec<Meal>>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
