// src/health.rs

use actix_web::{web, HttpResponse, Responder};
use chrono::Utc;
use serde_json::json;

use crate::app_state::AppState;

/// GET /
/// Service metadata and the endpoint map.
pub async fn index() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "name": "Task Manager API",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "endpoints": {
            "tasks": "/api/tasks",
            "categories": "/api/categories",
            "health": "/api/health",
            "stats": "/api/stats",
        },
    }))
}

/// GET /api/health
pub async fn health(data: web::Data<AppState>) -> impl Responder {
    let database = if data.db.ping().await { "connected" } else { "disconnected" };
    HttpResponse::Ok().json(json!({
        "status": "healthy",
        "timestamp": Utc::now(),
        "database": database,
    }))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;

    use crate::test_state;

    #[actix_web::test]
    async fn index_lists_endpoints() {
        let state = test_state().await;
        let app = test::init_service(App::new().configure(crate::configure(state))).await;

        let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["name"], "Task Manager API");
        assert_eq!(body["status"], "running");
        assert_eq!(body["endpoints"]["tasks"], "/api/tasks");
        assert_eq!(body["endpoints"]["stats"], "/api/stats");
    }

    #[actix_web::test]
    async fn health_reports_database() {
        let state = test_state().await;
        let app = test::init_service(App::new().configure(crate::configure(state))).await;

        let req = test::TestRequest::get().uri("/api/health").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["database"], "connected");
        assert!(body["timestamp"].is_string());
    }

    #[actix_web::test]
    async fn unknown_route_uses_envelope() {
        let state = test_state().await;
        let app = test::init_service(App::new().configure(crate::configure(state))).await;

        let req = test::TestRequest::get().uri("/api/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["error"], "Resource not found");
    }
}
