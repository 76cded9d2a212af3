//! Shared setup for the integration tests: an in-memory database with
//! migrations applied and the full router.

#![allow(dead_code)]

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use serde_json::Value;
use sqlx::SqlitePool;
use tasks_api::auth::AuthSettings;
use tasks_api::{db, routes};

pub const JWT_SECRET: &str = "integration-test-secret";

pub fn auth_settings() -> AuthSettings {
    AuthSettings {
        jwt_secret: JWT_SECRET.into(),
        token_ttl_hours: 24,
        // lowest cost bcrypt accepts
        bcrypt_cost: 4,
    }
}

pub async fn test_pool() -> SqlitePool {
    let pool = db::create_pool("sqlite::memory:", 1)
        .await
        .expect("Failed to open in-memory database");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    pool
}

pub fn app(
    pool: SqlitePool,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    app_with_settings(pool, auth_settings())
}

pub fn app_with_settings(
    pool: SqlitePool,
    settings: AuthSettings,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(pool))
        .app_data(web::Data::new(settings))
        .configure(routes::config)
}

/// Calls the service and returns the status with the body parsed as JSON
/// (`Value::Null` for an empty body).
pub async fn send(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    req: test::TestRequest,
) -> (StatusCode, Value) {
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status();
    let body = test::read_body(resp).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or_else(|_| {
            panic!("non-JSON body: {}", String::from_utf8_lossy(&body))
        })
    };
    (status, json)
}
