use actix_web::{
    http::{header, StatusCode},
    web, HttpRequest, HttpResponse, ResponseError,
};
use tracing::{instrument, warn};

use crate::{
    entities::contact::{
        ContactForm, INVALID_FORM_MESSAGE, INVALID_REQUEST_MESSAGE, RATE_LIMITED_MESSAGE,
    },
    errors::AppError,
    utils::get_client_ip::get_client_ip,
    AppState,
};

fn plain_text(status: StatusCode, body: impl Into<String>) -> HttpResponse {
    HttpResponse::build(status)
        .content_type("text/plain; charset=utf-8")
        .body(body.into())
}

/// Handles the contact form. Every answer is plain text meant to be shown to the visitor as is.
#[instrument(skip(req, state, form))]
pub async fn submit_contact_form(
    req: HttpRequest,
    state: web::Data<AppState>,
    form: Result<web::Form<ContactForm>, actix_web::Error>,
) -> HttpResponse {
    let client_ip = get_client_ip(&req, state.trust_forwarded_for);
    let decision = state.contact_limiter.check(&client_ip);
    if !decision.allowed {
        warn!(client_ip = %client_ip, "Contact form rate limited");
        let mut response = plain_text(StatusCode::TOO_MANY_REQUESTS, RATE_LIMITED_MESSAGE);
        if let Some(secs) = decision.retry_after {
            if let Ok(value) = header::HeaderValue::from_str(&secs.to_string()) {
                response.headers_mut().insert(header::RETRY_AFTER, value);
            }
        }
        return response;
    }

    let form = match form {
        Ok(form) => form.into_inner(),
        Err(e) => {
            warn!(error = %e, "Unreadable contact form body");
            return plain_text(StatusCode::BAD_REQUEST, INVALID_FORM_MESSAGE);
        }
    };

    match state.contact_handler.submit(form).await {
        Ok(outcome) => plain_text(StatusCode::OK, outcome.message()),
        Err(AppError::ValidationError(_)) => plain_text(StatusCode::BAD_REQUEST, INVALID_FORM_MESSAGE),
        Err(e) => {
            warn!(error = %e, "Contact form rejected");
            plain_text(e.status_code(), INVALID_FORM_MESSAGE)
        }
    }
}

pub async fn contact_method_not_allowed() -> HttpResponse {
    plain_text(StatusCode::METHOD_NOT_ALLOWED, INVALID_REQUEST_MESSAGE)
}
