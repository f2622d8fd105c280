use actix_cors::Cors;
use actix_web::http::{header, Method};

/// Cross-origin policy for the content API.
///
/// `*` in `origins` allows any origin. Browsers only need `GET`/`POST` with a
/// `Content-Type` header; preflight answers are cached for an hour.
pub fn cors_policy(origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers([header::CONTENT_TYPE, header::ACCEPT])
        .max_age(3600);

    if origins.iter().any(|origin| origin == "*") {
        return cors.allow_any_origin();
    }

    origins
        .iter()
        .fold(cors, |cors, origin| cors.allowed_origin(origin))
}
