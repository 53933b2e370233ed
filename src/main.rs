// src/main.rs

mod app_state;
mod category;
mod category_store;
mod config;
mod db;
mod error;
mod health;
mod models;
mod task;
mod task_store;

use std::io;

use actix_cors::Cors;
use actix_web::{http, middleware::Logger, web, App, HttpResponse, HttpServer};
use env_logger::Env;
use log::{error, info, warn};

use crate::app_state::AppState;
use crate::category::{create_category, list_categories};
use crate::config::Config;
use crate::db::Database;
use crate::error::ApiError;
use crate::health::{health, index};
use crate::task::{create_task, delete_task, get_task, list_tasks, task_stats, update_task};

/// Registers shared state, extractor error envelopes and every route.
pub fn configure(state: AppState) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg: &mut web::ServiceConfig| {
        cfg.app_data(web::Data::new(state))
            .app_data(
                web::JsonConfig::default()
                    .error_handler(|err, _req| ApiError::validation(err.to_string()).into()),
            )
            .app_data(web::PathConfig::default().error_handler(|_err, _req| {
                ApiError::NotFound("Resource not found".to_string()).into()
            }))
            .route("/", web::get().to(index))
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(health))
                    .route("/stats", web::get().to(task_stats))
                    .service(
                        web::scope("/tasks")
                            .route("", web::get().to(list_tasks))
                            .route("", web::post().to(create_task))
                            .route("/{task_id}", web::get().to(get_task))
                            .route("/{task_id}", web::put().to(update_task))
                            .route("/{task_id}", web::delete().to(delete_task)),
                    )
                    .service(
                        web::scope("/categories")
                            .route("", web::get().to(list_categories))
                            .route("", web::post().to(create_category)),
                    ),
            )
            .default_service(web::to(not_found));
    }
}

async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound("Resource not found".to_string()))
}

fn cors(config: &Config) -> Cors {
    let cors = match &config.frontend_origin {
        Some(origin) => Cors::default().allowed_origin(origin),
        None => Cors::default().allow_any_origin(),
    };
    cors.allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![
            http::header::CONTENT_TYPE,
            http::header::ACCEPT,
            http::header::AUTHORIZATION,
        ])
        .max_age(3600)
}

#[cfg(test)]
pub async fn test_state() -> AppState {
    AppState::new(db::test_database().await)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;
    if config.uses_default_secret() {
        warn!("SECRET_KEY not set, using the development default");
    }

    let db = Database::connect(&config.database_url).await.map_err(|e| {
        error!("Could not open database {}: {}", config.database_url, e);
        io::Error::new(io::ErrorKind::Other, e)
    })?;
    let state = AppState::new(db);
    state.categories.seed_defaults().await.map_err(|e| {
        error!("Could not seed default categories: {}", e);
        io::Error::new(io::ErrorKind::Other, e)
    })?;

    info!("Task Manager API startup");
    info!("Server running at http://{}", config.bind_address());
    match &config.frontend_origin {
        Some(origin) => info!("Allowed CORS Origin: {}", origin),
        None => info!("Allowed CORS Origin: any"),
    }

    let bind_address = config.bind_address();
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(cors(&config))
            .configure(configure(state.clone()))
    })
    .bind(bind_address)?
    .run()
    .await
}
