use actix_web::{get, http::header, HttpRequest, HttpResponse, Responder};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

const LANDING_PAGE: &str = include_str!("../../static/index.html");

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Welcome {
    pub message: String,
    /// Hint that browsers get an HTML page at the same URL.
    pub html: String,
}

fn wants_html(req: &HttpRequest) -> bool {
    req.headers()
        .get(header::ACCEPT)
        .and_then(|value| value.to_str().ok())
        .map(|accept| accept.contains("text/html"))
        .unwrap_or(false)
}

/// Landing page
///
/// Browsers (an `Accept` header containing `text/html`) get an HTML page,
/// everything else a JSON greeting.
#[utoipa::path(
    get,
    path = "/",
    tag = "Home",
    responses(
        (status = 200, description = "API home", body = Welcome, content_type = "application/json"),
    )
)]
#[get("/")]
pub async fn index(req: HttpRequest) -> impl Responder {
    if wants_html(&req) {
        return HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(LANDING_PAGE);
    }

    HttpResponse::Ok().json(Welcome {
        message: "Welcome to the Tasks API starter kit".into(),
        html: "Open this route in a browser for the HTML landing page".into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test;

    #[actix_web::test]
    async fn test_index_serves_html_to_browsers() {
        let app = test::init_service(actix_web::App::new().service(index)).await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ACCEPT, "text/html,application/xhtml+xml"))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert!(resp.status().is_success());
        let content_type = resp.headers().get(header::CONTENT_TYPE).unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/html"));
        let body = test::read_body(resp).await;
        assert!(String::from_utf8_lossy(&body).contains("<!DOCTYPE html>"));
    }

    #[actix_web::test]
    async fn test_index_serves_json_by_default() {
        let app = test::init_service(actix_web::App::new().service(index)).await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header((header::ACCEPT, "application/json"))
            .to_request();
        let json: serde_json::Value = test::call_and_read_body_json(&app, req).await;

        assert!(json["message"].is_string());
        assert!(json["html"].is_string());
    }
}
