use crate::{
    error::{AppError, Issue},
    models::{NewTask, PatchTask, Task},
};
use actix_web::{delete, get, patch, post, web, HttpResponse, Responder};
use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use validator::Validate;

const TASK_COLUMNS: &str = "id, name, description, done, created_at, updated_at";

/// List tasks
///
/// Returns every task ordered by id.
#[utoipa::path(
    get,
    path = "/tasks",
    tag = "Tasks",
    responses((status = 200, description = "The list of tasks", body = [Task]))
)]
#[get("")]
pub async fn list(pool: web::Data<SqlitePool>) -> Result<impl Responder, AppError> {
    let tasks = sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks ORDER BY id",
        TASK_COLUMNS
    ))
    .fetch_all(&**pool)
    .await?;

    Ok(HttpResponse::Ok().json(tasks))
}

/// Create a task
///
/// `done` defaults to `false`; both timestamps are set by the server.
#[utoipa::path(
    post,
    path = "/tasks",
    tag = "Tasks",
    request_body(content = NewTask, description = "The task to create"),
    responses(
        (status = 200, description = "The created task", body = Task),
        (status = 422, description = "The validation error(s)", body = ErrorBody),
    )
)]
#[post("")]
pub async fn create(
    pool: web::Data<SqlitePool>,
    task_data: web::Json<NewTask>,
) -> Result<impl Responder, AppError> {
    task_data.validate()?;

    let now = Utc::now();
    let task = sqlx::query_as::<_, Task>(&format!(
        "INSERT INTO tasks (name, description, done, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)
         RETURNING {}",
        TASK_COLUMNS
    ))
    .bind(&task_data.name)
    .bind(&task_data.description)
    .bind(task_data.done)
    .bind(now)
    .bind(now)
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(|| AppError::UnprocessableEntity("Task creation failed".into()))?;

    Ok(HttpResponse::Ok().json(task))
}

/// Get one task
#[utoipa::path(
    get,
    path = "/tasks/{id}",
    tag = "Tasks",
    params(("id" = i64, Path, description = "Task id")),
    responses(
        (status = 200, description = "The requested task", body = Task),
        (status = 404, description = "Task not found", body = ErrorBody),
        (status = 422, description = "Invalid id error", body = ErrorBody),
    )
)]
#[get("/{id}")]
pub async fn get_one(
    pool: web::Data<SqlitePool>,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let task = sqlx::query_as::<_, Task>(&format!(
        "SELECT {} FROM tasks WHERE id = ?",
        TASK_COLUMNS
    ))
    .bind(task_id.into_inner())
    .fetch_optional(&**pool)
    .await?
    .ok_or_else(AppError::not_found)?;

    Ok(HttpResponse::Ok().json(task))
}

/// Update a task
///
/// Applies a partial update and bumps `updatedAt`. Sending `"description": null`
/// clears the description.
#[utoipa::path(
    patch,
    path = "/tasks/{id}",
    tag = "Tasks",
    params(("id" = i64, Path, description = "Task id")),
    request_body(content = PatchTask, description = "The task updates"),
    responses(
        (status = 200, description = "The updated task", body = Task),
        (status = 404, description = "Task not found", body = ErrorBody),
        (status = 422, description = "The validation error(s)", body = ErrorBody),
    )
)]
#[patch("/{id}")]
pub async fn update(
    pool: web::Data<SqlitePool>,
    task_id: web::Path<i64>,
    updates: web::Json<PatchTask>,
) -> Result<impl Responder, AppError> {
    let updates = updates.into_inner();
    if updates.is_empty() {
        return Err(AppError::Validation(vec![Issue::no_updates()]));
    }
    updates.validate()?;

    let mut query = QueryBuilder::<Sqlite>::new("UPDATE tasks SET ");
    {
        let mut sets = query.separated(", ");
        if let Some(name) = updates.name {
            sets.push("name = ").push_bind_unseparated(name);
        }
        if let Some(description) = updates.description {
            sets.push("description = ").push_bind_unseparated(description);
        }
        if let Some(done) = updates.done {
            sets.push("done = ").push_bind_unseparated(done);
        }
        sets.push("updated_at = ").push_bind_unseparated(Utc::now());
    }
    query
        .push(" WHERE id = ")
        .push_bind(task_id.into_inner())
        .push(format!(" RETURNING {}", TASK_COLUMNS));

    let task = query
        .build_query_as::<Task>()
        .fetch_optional(&**pool)
        .await?
        .ok_or_else(AppError::not_found)?;

    Ok(HttpResponse::Ok().json(task))
}

/// Delete a task
#[utoipa::path(
    delete,
    path = "/tasks/{id}",
    tag = "Tasks",
    params(("id" = i64, Path, description = "Task id")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 404, description = "Task not found", body = ErrorBody),
        (status = 422, description = "Invalid id error", body = ErrorBody),
    )
)]
#[delete("/{id}")]
pub async fn remove(
    pool: web::Data<SqlitePool>,
    task_id: web::Path<i64>,
) -> Result<impl Responder, AppError> {
    let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
        .bind(task_id.into_inner())
        .execute(&**pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::not_found());
    }

    Ok(HttpResponse::NoContent().finish())
}
