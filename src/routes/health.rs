use actix_web::{get, web, HttpResponse, Responder};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthReport {
    /// `"ok"` when the database answers, `"degraded"` otherwise.
    pub status: String,
    /// `"up"` or `"down"`.
    pub database: String,
    pub timestamp: DateTime<Utc>,
}

async fn database_is_up(pool: &SqlitePool) -> bool {
    match sqlx::query_scalar::<_, i64>("SELECT 1").fetch_one(pool).await {
        Ok(_) => true,
        Err(e) => {
            log::error!("health check could not reach the database: {}", e);
            false
        }
    }
}

/// Service health
///
/// Pings the database and reports whether requests can be served.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Home",
    responses(
        (status = 200, description = "Service and database are up", body = HealthReport),
        (status = 503, description = "The database is unreachable", body = HealthReport),
    )
)]
#[get("/health")]
pub async fn health(pool: web::Data<SqlitePool>) -> impl Responder {
    let database_up = database_is_up(&pool).await;
    let report = HealthReport {
        status: if database_up { "ok" } else { "degraded" }.into(),
        database: if database_up { "up" } else { "down" }.into(),
        timestamp: Utc::now(),
    };

    if database_up {
        HttpResponse::Ok().json(report)
    } else {
        HttpResponse::ServiceUnavailable().json(report)
    }
}
