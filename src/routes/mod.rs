pub mod docs;
pub mod health;
pub mod index;
pub mod tasks;
pub mod users;

use actix_web::{
    error::{JsonPayloadError, PathError},
    web, Error, HttpRequest,
};

use crate::error::{codes, messages, AppError, Issue};

/// Mounts every route and the extractor error handlers.
///
/// The caller provides `web::Data<SqlitePool>` and `web::Data<AuthSettings>`.
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(index::index)
        .service(health::health)
        .service(docs::openapi_json)
        .service(docs::reference)
        .service(
            web::scope("/users")
                .service(users::register)
                .service(users::login)
                // before `/{id}` so that "me" is not parsed as an id
                .service(users::me)
                .service(users::list)
                .service(users::create)
                .service(users::get_one)
                .service(users::update)
                .service(users::remove),
        )
        .service(
            web::scope("/tasks")
                .service(tasks::list)
                .service(tasks::create)
                .service(tasks::get_one)
                .service(tasks::update)
                .service(tasks::remove),
        );
}

/// Reports body deserialization failures as validation issues.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    let app_error = match &err {
        JsonPayloadError::Deserialize(de) => {
            let text = de.to_string();
            let issue = match missing_field(&text) {
                Some(field) => Issue::new(codes::INVALID_TYPE, &[field], messages::REQUIRED),
                None => Issue::new(codes::INVALID_TYPE, &[], text.as_str()),
            };
            AppError::Validation(vec![issue])
        }
        other => AppError::BadRequest(other.to_string()),
    };
    app_error.into()
}

/// Reports a path segment that is not a number, e.g. `/users/abc`.
fn path_error_handler(err: PathError, req: &HttpRequest) -> Error {
    log::debug!("rejected path {}: {}", req.path(), err);
    let field = req
        .match_info()
        .iter()
        .find(|(_, value)| value.parse::<i64>().is_err())
        .map(|(name, _)| name.to_string())
        .unwrap_or_else(|| "id".to_string());

    AppError::Validation(vec![Issue::new(
        codes::INVALID_TYPE,
        &[field.as_str()],
        messages::EXPECTED_NUMBER,
    )])
    .into()
}

/// Pulls `nom` out of serde's "missing field `nom` at line 1 column 27".
fn missing_field(message: &str) -> Option<&str> {
    message.strip_prefix("missing field `")?.split('`').next()
}
