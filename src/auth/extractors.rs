use actix_web::dev::Payload;
use actix_web::{http::header, web, Error as ActixError, FromRequest, HttpRequest};
use futures::future::{ready, Ready};

use crate::auth::{token::verify_token, AuthSettings, Claims};
use crate::error::AppError;

/// The caller identified by a valid `Authorization: Bearer <token>` header.
///
/// Using this extractor in a handler is what makes the route authenticated;
/// routes that do not ask for it stay open.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Claims);

impl AuthenticatedUser {
    pub fn id(&self) -> i64 {
        self.0.sub
    }
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AppError> {
    let settings = req
        .app_data::<web::Data<AuthSettings>>()
        .ok_or_else(|| AppError::InternalServerError("AuthSettings not configured".into()))?;

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Missing token".into()))?;

    let claims = verify_token(token.trim(), &settings.jwt_secret)?;
    Ok(AuthenticatedUser(claims))
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req).map_err(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::token::generate_token;
    use actix_web::http::StatusCode;
    use actix_web::test;

    fn settings() -> AuthSettings {
        AuthSettings {
            jwt_secret: "extractor-secret".into(),
            token_ttl_hours: 1,
            bcrypt_cost: 4,
        }
    }

    #[actix_rt::test]
    async fn test_authenticated_user_extractor_success() {
        let token = generate_token(123, "me@example.com", "extractor-secret", 1).unwrap();
        let req = test::TestRequest::default()
            .app_data(web::Data::new(settings()))
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_request();

        let mut payload = Payload::None;
        let user = AuthenticatedUser::from_request(&req, &mut payload)
            .await
            .unwrap();
        assert_eq!(user.id(), 123);
        assert_eq!(user.0.email, "me@example.com");
    }

    #[actix_rt::test]
    async fn test_authenticated_user_extractor_missing_header() {
        let req = test::TestRequest::default()
            .app_data(web::Data::new(settings()))
            .to_http_request();

        let mut payload = Payload::None;
        let err = AuthenticatedUser::from_request(&req, &mut payload)
            .await
            .unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_rt::test]
    async fn test_authenticated_user_extractor_wrong_secret() {
        let token = generate_token(5, "me@example.com", "someone-else", 1).unwrap();
        let req = test::TestRequest::default()
            .app_data(web::Data::new(settings()))
            .insert_header((header::AUTHORIZATION, format!("Bearer {}", token)))
            .to_http_request();

        let mut payload = Payload::None;
        let err = AuthenticatedUser::from_request(&req, &mut payload)
            .await
            .unwrap_err();
        assert_eq!(err.error_response().status(), StatusCode::UNAUTHORIZED);
    }
}
