// src/category.rs

use actix_web::{web, HttpResponse};
use log::info;
use serde_json::json;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::CreateCategoryRequest;

/// GET /api/categories
pub async fn list_categories(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let categories = data.categories.list().await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "categories": categories })))
}

/// POST /api/categories
pub async fn create_category(
    data: web::Data<AppState>,
    payload: web::Json<CreateCategoryRequest>,
) -> Result<HttpResponse, ApiError> {
    let new_category = payload.into_inner().validate()?;
    let category = data.categories.create(new_category).await?;
    info!("Category created: {}", category.name);

    Ok(HttpResponse::Created().json(json!({ "success": true, "category": category })))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use serde_json::{json, Value};

    use crate::test_state;

    #[actix_web::test]
    async fn lists_seeded_categories() {
        let state = test_state().await;
        state.categories.seed_defaults().await.unwrap();
        let app = test::init_service(App::new().configure(crate::configure(state.clone()))).await;

        let req = test::TestRequest::get().uri("/api/categories").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], true);
        let categories = body["categories"].as_array().unwrap();
        assert_eq!(categories.len(), 5);
        assert_eq!(categories[0]["name"], "Work");
        assert_eq!(categories[0]["color"], "#3B82F6");
    }

    #[actix_web::test]
    async fn create_and_reject_duplicates() {
        let state = test_state().await;
        let app = test::init_service(App::new().configure(crate::configure(state.clone()))).await;

        let req = test::TestRequest::post()
            .uri("/api/categories")
            .set_json(json!({ "name": "Errands", "color": "#123456" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["category"]["name"], "Errands");
        assert_eq!(body["category"]["color"], "#123456");

        let req = test::TestRequest::post()
            .uri("/api/categories")
            .set_json(json!({ "name": "Errands" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);

        assert_eq!(state.categories.list().await.unwrap().len(), 1);
    }

    #[actix_web::test]
    async fn name_is_required() {
        let state = test_state().await;
        let app = test::init_service(App::new().configure(crate::configure(state.clone()))).await;

        let req = test::TestRequest::post()
            .uri("/api/categories")
            .set_json(json!({ "name": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "success": false, "error": "Name is required" }));
    }
}
