use axum::{routing::post, Json, Router};
use tracing::{debug, instrument};

use super::dto::{GroceryListRequest, GroceryListResponse};
use super::services::create_grocery_list;
use crate::{extract::JsonBody, state::AppState};

pub fn grocery_routes() -> Router<AppState> {
    Router::new().route("/grocery-list", post(grocery_list))
}

#[instrument(skip(body), fields(meals = body.meals.len()))]
pub async fn grocery_list(JsonBody(body): JsonBody<GroceryListRequest>) -> Json<GroceryListResponse> {
    let items = create_grocery_list(&body.meals);
    debug!(items = items.len(), "grocery list built");
    Json(GroceryListResponse { items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meals::schema::Meal;
    use axum::{
        body::{to_bytes, Body},
        http::{header::CONTENT_TYPE, Request, StatusCode},
    };
    use tower::ServiceExt;

    #[tokio::test]
    async fn malformed_body_is_answered_with_json_error() {
        let app = grocery_routes().with_state(AppState::fake());
        let req = Request::builder()
            .method("POST")
            .uri("/grocery-list")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"meals":[{"id":1}]}"#))
            .unwrap();

        let res = app.oneshot(req).await.unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(res.headers()[CONTENT_TYPE], "application/json");
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(json["error"]
            .as_str()
            .unwrap()
            .starts_with("Failed to deserialize the JSON body"));
    }

    #[tokio::test]
    async fn accepts_meals_without_ingredients() {
        let meals: Vec<Meal> = serde_json::from_value(serde_json::json!([
            {
                "id": "1", "day": "Mon", "name": "Water", "description": "Just water",
                "prepMinutes": 0, "cookMinutes": 0, "ingredients": [], "steps": ["Drink"]
            },
            {
                "id": "2", "day": "Tue", "name": "Toast", "description": "Toast",
                "prepMinutes": 1, "cookMinutes": 2,
                "ingredients": [{ "item": "bread", "quantity": "2 slices" }],
                "steps": ["Toast it"]
            }
        ]))
        .unwrap();

        let Json(res) = grocery_list(JsonBody(GroceryListRequest { meals })).await;

        let json = serde_json::to_value(&res).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "items": [
                    { "item": "Bread", "quantity": "2 slices", "originalQuantities": ["2 slices"] }
                ]
            })
        );
    }
}
