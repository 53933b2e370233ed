// src/task.rs

use actix_web::{web, HttpResponse};
use log::info;
use serde_json::json;

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::{CreateTaskRequest, TaskFilter, TaskQuery, UpdateTaskRequest};

/// GET /api/tasks
/// List tasks, optionally filtered by category, priority, completed and search.
pub async fn list_tasks(
    data: web::Data<AppState>,
    query: web::Query<TaskQuery>,
) -> Result<HttpResponse, ApiError> {
    let filter = TaskFilter::from(query.into_inner());
    let tasks = data.tasks.list(&filter).await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "count": tasks.len(),
        "tasks": tasks,
    })))
}

/// GET /api/tasks/{id}
pub async fn get_task(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let task = data.tasks.get(path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "task": task })))
}

/// POST /api/tasks
pub async fn create_task(
    data: web::Data<AppState>,
    payload: web::Json<CreateTaskRequest>,
) -> Result<HttpResponse, ApiError> {
    let new_task = payload.into_inner().validate()?;
    let task = data.tasks.create(new_task).await?;
    info!("Task created: {} (id {})", task.title, task.id);

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Task created successfully",
        "task": task,
    })))
}

/// PUT /api/tasks/{id}
/// Merge-patch: only the fields present in the body change.
pub async fn update_task(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<UpdateTaskRequest>,
) -> Result<HttpResponse, ApiError> {
    let task = data.tasks.update(path.into_inner(), payload.into_inner()).await?;
    info!("Task updated: {} (id {})", task.title, task.id);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Task updated successfully",
        "task": task,
    })))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let title = data.tasks.delete(id).await?;
    info!("Task deleted: {} (id {})", title, id);

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Task deleted successfully",
    })))
}

/// GET /api/stats
pub async fn task_stats(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let stats = data.tasks.stats().await?;
    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "total_tasks": stats.total_tasks,
        "completed_tasks": stats.completed_tasks,
        "pending_tasks": stats.pending_tasks,
        "completion_rate": stats.completion_rate,
    })))
}
