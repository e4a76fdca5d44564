use std::collections::HashSet;

use sqlx::PgPool;
use time::Date;
use tracing::info;
use uuid::Uuid;

use super::dto::Plan;
use super::repo;
use super::week::monday_of;
use crate::error::ApiError;
use crate::meals::schema::{validate_meals, Meal};

/// Every saved meal must satisfy the meal invariants and have an id unique
/// within the plan.
pub fn check_plan_meals(meals: &[Meal]) -> Result<(), ApiError> {
    validate_meals(meals).map_err(|e| ApiError::InvalidInput(e.to_string()))?;
    let mut seen = HashSet::new();
    for meal in meals {
        if !seen.insert(meal.id.as_str()) {
            return Err(ApiError::InvalidInput(format!(
                "duplicate meal id `{}` in plan",
                meal.id
            )));
        }
    }
    Ok(())
}

/// Swaps the meal with `meal_id` for `replacement`, keeping its position.
pub fn replace_meal(meals: &mut [Meal], meal_id: &str, replacement: Meal) -> Result<(), ApiError> {
    let slot = meals
        .iter_mut()
        .find(|m| m.id == meal_id)
        .ok_or_else(|| ApiError::NotFound(format!("Meal `{}` not found in plan", meal_id)))?;
    *slot = replacement;
    Ok(())
}

pub fn remove_meal(meals: &mut Vec<Meal>, meal_id: &str) -> Result<Meal, ApiError> {
    let index = meals
        .iter()
        .position(|m| m.id == meal_id)
        .ok_or_else(|| ApiError::NotFound(format!("Meal `{}` not found in plan", meal_id)))?;
    Ok(meals.remove(index))
}

pub async fn save_plan(
    db: &PgPool,
    user_id: Uuid,
    week_start: Date,
    meals: &[Meal],
) -> Result<Plan, ApiError> {
    check_plan_meals(meals)?;
    let week_start = monday_of(week_start);
    let row = repo::upsert(db, user_id, week_start, meals).await?;
    info!(%user_id, plan_id = %row.id, %week_start, meals = meals.len(), "plan saved");
    Ok(row.into())
}

pub async fn plan_for_week(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
) -> Result<Option<Plan>, ApiError> {
    let row = repo::find_by_week(db, user_id, monday_of(date)).await?;
    Ok(row.map(Plan::from))
}

pub async fn user_plans(db: &PgPool, user_id: Uuid) -> Result<Vec<Plan>, ApiError> {
    let rows = repo::list_by_user(db, user_id).await?;
    Ok(rows.into_iter().map(Plan::from).collect())
}

pub async fn delete_plan(db: &PgPool, user_id: Uuid, date: Date) -> Result<(), ApiError> {
    let week_start = monday_of(date);
    if !repo::delete_by_week(db, user_id, week_start).await? {
        return Err(ApiError::NotFound("Plan not found".into()));
    }
    info!(%user_id, %week_start, "plan deleted");
    Ok(())
}

/// Loads the week's plan, applies `edit` to its meals and saves the result.
pub async fn edit_plan_meals<F>(
    db: &PgPool,
    user_id: Uuid,
    date: Date,
    edit: F,
) -> Result<Plan, ApiError>
where
    F: FnOnce(&mut Vec<Meal>) -> Result<(), ApiError>,
{
    let mut plan = plan_for_week(db, user_id, date)
        .await?
        .ok_or_else(|| ApiError::NotFound("Plan not found".into()))?;
    edit(&mut plan.meals)?;
    save_plan(db, user_id, plan.week_start, &plan.meals).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meals::schema::{fixtures::meal, Day};
    use axum::http::StatusCode;

    fn week() -> Vec<Meal> {
        vec![
            meal("a", Day::Sun, "Tacos"),
            meal("b", Day::Mon, "Soup"),
            meal("c", Day::Tue, "Curry"),
        ]
    }

    #[test]
    fn accepts_valid_plan() {
        assert!(check_plan_meals(&week()).is_ok());
        assert!(check_plan_meals(&[]).is_ok());
    }

    #[test]
    fn rejects_duplicate_ids() {
        let mut meals = week();
        meals[2].id = "a".into();
        let err = check_plan_meals(&meals).unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("duplicate meal id `a`"));
    }

    #[test]
    fn rejects_meal_without_steps() {
        let mut meals = week();
        meals[1].steps.clear();
        assert_eq!(check_plan_meals(&meals).unwrap_err().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn replace_keeps_position() {
        let mut meals = week();
        replace_meal(&mut meals, "b", meal("z", Day::Mon, "Ramen")).unwrap();
        let names: Vec<&str> = meals.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, ["Tacos", "Ramen", "Curry"]);
    }

    #[test]
    fn replace_unknown_meal_is_not_found() {
        let mut meals = week();
        let err = replace_meal(&mut meals, "nope", meal("z", Day::Mon, "Ramen")).unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(meals, week());
    }

    #[test]
    fn remove_returns_removed_meal() {
        let mut meals = week();
        let removed = remove_meal(&mut meals, "a").unwrap();
        assert_eq!(removed.name, "Tacos");
        assert_eq!(meals.len(), 2);
        assert!(remove_meal(&mut meals, "a").is_err());
    }
}
