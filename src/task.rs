// src/task.rs

use actix_web::error::JsonPayloadError;
use actix_web::{error, web, HttpRequest, HttpResponse};

use crate::app_state::AppState;
use crate::error::ApiError;
use crate::models::{TaskDto, TaskStatusRequest};

/// Mounts the /tasks resource.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/tasks")
            .app_data(json_config())
            .app_data(path_config())
            .route("", web::post().to(create_task))
            .route("", web::get().to(list_tasks))
            .route("", web::patch().to(update_task_status))
            .route("/{id}", web::get().to(get_task))
            .route("/{id}", web::put().to(update_task))
            .route("/{id}", web::delete().to(delete_task)),
    );
}

// Bodies that parse but do not fit the task shape get a 400 with the reason;
// size and content-type rejections keep their own status.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req: &HttpRequest| match err {
        JsonPayloadError::Deserialize(e) => {
            let message = e.to_string();
            error::InternalError::from_response(e, HttpResponse::BadRequest().body(message)).into()
        }
        other => other.into(),
    })
}

// Non-numeric ids are a malformed request, not a missing task.
fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req: &HttpRequest| {
        let message = err.to_string();
        error::InternalError::from_response(err, HttpResponse::BadRequest().body(message)).into()
    })
}

/// POST /tasks
pub async fn create_task(
    data: web::Data<AppState>,
    payload: web::Json<TaskDto>,
) -> Result<HttpResponse, ApiError> {
    let created = data.tasks.create(payload.into_inner()).await?;
    Ok(HttpResponse::Ok().json(created))
}

/// GET /tasks/{id}
pub async fn get_task(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let task = data.tasks.get_by_id(id).await?.ok_or(ApiError::NotFound(id))?;
    Ok(HttpResponse::Ok().json(task))
}

/// PUT /tasks/{id}
pub async fn update_task(
    data: web::Data<AppState>,
    path: web::Path<i64>,
    payload: web::Json<TaskDto>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let task = data
        .tasks
        .update(id, payload.into_inner())
        .await?
        .ok_or(ApiError::NotFound(id))?;
    Ok(HttpResponse::Ok().json(task))
}

/// DELETE /tasks/{id}
pub async fn delete_task(
    data: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    if !data.tasks.delete(id).await? {
        return Err(ApiError::NotFound(id));
    }
    Ok(HttpResponse::Ok().finish())
}

/// GET /tasks
pub async fn list_tasks(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let tasks = data.tasks.list().await?;
    Ok(HttpResponse::Ok().json(tasks))
}

/// PATCH /tasks
pub async fn update_task_status(
    data: web::Data<AppState>,
    payload: web::Json<TaskStatusRequest>,
) -> Result<HttpResponse, ApiError> {
    let TaskStatusRequest { id, status } = payload.into_inner();
    let task = data
        .tasks
        .update_status(id, status)
        .await?
        .ok_or(ApiError::NotFound(id))?;
    Ok(HttpResponse::Ok().json(task))
}
