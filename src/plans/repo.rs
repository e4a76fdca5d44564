use sqlx::{types::Json, PgPool};
use time::Date;
use uuid::Uuid;

use super::repo_types::PlanRow;
use crate::error::PersistenceError;
use crate::meals::schema::Meal;

const PLAN_COLUMNS: &str = "id, user_id, week_start, meals, created_at, updated_at";

/// One plan per (user, week): inserts or replaces the meals in a single statement.
pub async fn upsert(
    db: &PgPool,
    user_id: Uuid,
    week_start: Date,
    meals: &[Meal],
) -> Result<PlanRow, PersistenceError> {
    sqlx::query_as::<_, PlanRow>(&format!(
        r#"
        INSERT INTO plans (user_id, week_start, meals)
        VALUES ($1, $2, $3)
        ON CONFLICT (user_id, week_start)
        DO UPDATE SET meals = EXCLUDED.meals, updated_at = now()
        RETURNING {PLAN_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(week_start)
    .bind(Json(meals))
    .fetch_one(db)
    .await
    .map_err(|e| PersistenceError::from_sqlx("Failed to save meal plan", e))
}

pub async fn find_by_week(
    db: &PgPool,
    user_id: Uuid,
    week_start: Date,
) -> Result<Option<PlanRow>, PersistenceError> {
    sqlx::query_as::<_, PlanRow>(&format!(
        r#"
        SELECT {PLAN_COLUMNS}
        FROM plans
        WHERE user_id = $1 AND week_start = $2
        "#
    ))
    .bind(user_id)
    .bind(week_start)
    .fetch_optional(db)
    .await
    .map_err(|e| PersistenceError::from_sqlx("Failed to load meal plan", e))
}

pub async fn list_by_user(db: &PgPool, user_id: Uuid) -> Result<Vec<PlanRow>, PersistenceError> {
    sqlx::query_as::<_, PlanRow>(&format!(
        r#"
        SELECT {PLAN_COLUMNS}
        FROM plans
        WHERE user_id = $1
        ORDER BY week_start DESC
        "#
    ))
    .bind(user_id)
    .fetch_all(db)
    .await
    .map_err(|e| PersistenceError::from_sqlx("Failed to load meal plans", e))
}

/// Deletes the owner's plan for a week; returns whether a row was removed.
pub async fn delete_by_week(
    db: &PgPool,
    user_id: Uuid,
    week_start: Date,
) -> Result<bool, PersistenceError> {
    let result = sqlx::query(
        r#"
        DELETE FROM plans
        WHERE user_id = $1 AND week_start = $2
        "#,
    )
    .bind(user_id)
    .bind(week_start)
    .execute(db)
    .await
    .map_err(|e| PersistenceError::from_sqlx("Failed to delete meal plan", e))?;
    Ok(result.rows_affected() > 0)
}
