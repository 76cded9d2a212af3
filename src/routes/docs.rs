use actix_web::{get, HttpResponse, Responder};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::auth::{LoginRequest, TokenResponse};
use crate::error::{ErrorBody, ErrorDetails, Issue};
use crate::models::{NewTask, PatchTask, PatchUser, RegisterUser, Task, UserResponse};
use crate::routes::{health, index, tasks, users};

const REFERENCE_PAGE: &str = r#"<!DOCTYPE html>
<html>
  <head>
    <title>Tasks API Reference</title>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
  </head>
  <body>
    <script id="api-reference" data-url="/doc"></script>
    <script src="https://cdn.jsdelivr.net/npm/@scalar/api-reference"></script>
  </body>
</html>"#;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Tasks API",
        version = "1.0.0",
        description = "CRUD for tasks and users, with registration and token login."
    ),
    paths(
        index::index,
        health::health,
        users::register,
        users::login,
        users::me,
        users::list,
        users::create,
        users::get_one,
        users::update,
        users::remove,
        tasks::list,
        tasks::create,
        tasks::get_one,
        tasks::update,
        tasks::remove,
    ),
    components(schemas(
        UserResponse,
        RegisterUser,
        PatchUser,
        LoginRequest,
        TokenResponse,
        Task,
        NewTask,
        PatchTask,
        ErrorBody,
        ErrorDetails,
        Issue,
        index::Welcome,
        health::HealthReport,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "Home", description = "Landing page and service health"),
        (name = "Users", description = "Registration, login and user management"),
        (name = "Tasks", description = "Task management"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by authenticated routes.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// The generated OpenAPI document.
#[get("/doc")]
pub async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

/// Interactive reference rendered from `/doc`.
#[get("/reference")]
pub async fn reference() -> impl Responder {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(REFERENCE_PAGE)
}
