use axum::{
    extract::Path,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use time::Date;
use tracing::instrument;

use super::dto::{Plan, PlanResponse, SavePlanRequest};
use super::services::{self, remove_meal, replace_meal};
use super::week::{current_monday, format_week_start, parse_week_start};
use crate::{
    auth::extractors::AuthUser,
    db::Db,
    error::ApiError,
    extract::JsonBody,
    grocery::{dto::GroceryListResponse, services::create_grocery_list},
    meals::schema::Meal,
    state::AppState,
};

pub fn plan_routes() -> Router<AppState> {
    Router::new()
        .route("/plans", get(list_plans))
        .route("/plans/current", get(current_plan))
        .route(
            "/plans/:week_start",
            get(get_plan).put(save_plan).delete(delete_plan),
        )
        .route(
            "/plans/:week_start/meals/:meal_id",
            put(replace_plan_meal).delete(remove_plan_meal),
        )
        .route("/plans/:week_start/grocery-list", get(plan_grocery_list))
}

fn week_param(raw: &str) -> Result<Date, ApiError> {
    parse_week_start(raw).map_err(|_| {
        ApiError::InvalidInput(format!(
            "Invalid week_start `{}`, expected YYYY-MM-DD such as {}",
            raw,
            format_week_start(current_monday())
        ))
    })
}

#[instrument(skip(db))]
pub async fn list_plans(Db(db): Db, AuthUser(user_id): AuthUser) -> Result<Json<Vec<Plan>>, ApiError> {
    Ok(Json(services::user_plans(&db, user_id).await?))
}

#[instrument(skip(db))]
pub async fn current_plan(Db(db): Db, AuthUser(user_id): AuthUser) -> Result<Json<PlanResponse>, ApiError> {
    let plan = services::plan_for_week(&db, user_id, current_monday()).await?;
    Ok(Json(PlanResponse { plan }))
}

#[instrument(skip(db))]
pub async fn get_plan(
    Db(db): Db,
    AuthUser(user_id): AuthUser,
    Path(week_start): Path<String>,
) -> Result<Json<PlanResponse>, ApiError> {
    let date = week_param(&week_start)?;
    let plan = services::plan_for_week(&db, user_id, date).await?;
    Ok(Json(PlanResponse { plan }))
}

#[instrument(skip(db, body), fields(meals = body.meals.len()))]
pub async fn save_plan(
    Db(db): Db,
    AuthUser(user_id): AuthUser,
    Path(week_start): Path<String>,
    JsonBody(body): JsonBody<SavePlanRequest>,
) -> Result<Json<PlanResponse>, ApiError> {
    let date = week_param(&week_start)?;
    let plan = services::save_plan(&db, user_id, date, &body.meals).await?;
    Ok(Json(PlanResponse { plan: Some(plan) }))
}

#[instrument(skip(db))]
pub async fn delete_plan(
    Db(db): Db,
    AuthUser(user_id): AuthUser,
    Path(week_start): Path<String>,
) -> Result<StatusCode, ApiError> {
    let date = week_param(&week_start)?;
    services::delete_plan(&db, user_id, date).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(db, meal))]
pub async fn replace_plan_meal(
    Db(db): Db,
    AuthUser(user_id): AuthUser,
    Path((week_start, meal_id)): Path<(String, String)>,
    JsonBody(meal): JsonBody<Meal>,
) -> Result<Json<PlanResponse>, ApiError> {
    let date = week_param(&week_start)?;
    let plan = services::edit_plan_meals(&db, user_id, date, |meals| {
        replace_meal(meals, &meal_id, meal)
    })
    .await?;
    Ok(Json(PlanResponse { plan: Some(plan) }))
}

#[instrument(skip(db))]
pub async fn remove_plan_meal(
    Db(db): Db,
    AuthUser(user_id): AuthUser,
    Path((week_start, meal_id)): Path<(String, String)>,
) -> Result<Json<PlanResponse>, ApiError> {
    let date = week_param(&week_start)?;
    let plan = services::edit_plan_meals(&db, user_id, date, |meals| {
        remove_meal(meals, &meal_id).map(|_| ())
    })
    .await?;
    Ok(Json(PlanResponse { plan: Some(plan) }))
}

#[instrument(skip(db))]
pub async fn plan_grocery_list(
    Db(db): Db,
    AuthUser(user_id): AuthUser,
    Path(week_start): Path<String>,
) -> Result<Json<GroceryListResponse>, ApiError> {
    let date = week_param(&week_start)?;
    let plan = services::plan_for_week(&db, user_id, date)
        .await?
        .ok_or_else(|| ApiError::NotFound("Plan not found".into()))?;
    Ok(Json(GroceryListResponse {
        items: create_grocery_list(&plan.meals),
    }))
}
