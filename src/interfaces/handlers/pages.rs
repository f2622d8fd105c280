use actix_web::{
    http::header::{self, ContentType},
    web, HttpRequest, HttpResponse,
};
use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::{
    entities::project::ProjectListQuery,
    site::{
        pages::{render_page, Page, PageContext},
        preferences::{Consent, Preferences, Theme},
    },
    AppState,
};

const GALLERY_SCRIPT: &str = include_str!("../../../assets/gallery.js");

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub limit: Option<String>,
}

impl PageQuery {
    fn into_project_query(self) -> ProjectListQuery {
        let mut query = ProjectListQuery::first_page(self.category, self.search);
        if let Some(limit) = self.limit.and_then(|l| l.trim().parse::<i64>().ok()) {
            query.limit = Some(limit);
        }
        query
    }
}

/// Renders one page and refreshes the visitor's preferences cookie.
#[instrument(skip(req, state, query))]
pub async fn render(
    req: HttpRequest,
    state: web::Data<AppState>,
    filename: web::Path<String>,
    query: web::Query<PageQuery>,
) -> HttpResponse {
    let Some(page) = Page::detect(&filename) else {
        debug!(filename = %filename, "Unknown page requested");
        return HttpResponse::NotFound()
            .content_type(ContentType::plaintext())
            .body("Page not found");
    };

    let mut preferences = Preferences::from_request(&req);
    let first_visit = preferences.record_visit(&filename, Utc::now());

    let ctx = PageContext {
        page,
        loader: state.loader.clone(),
        preferences,
        consent: Consent::from_request(&req),
        first_visit,
        project_query: query.into_inner().into_project_query(),
        api_base: state.api_base.clone(),
    };

    let rendered = render_page(&ctx).await;

    HttpResponse::Ok()
        .content_type(ContentType::html())
        .cookie(ctx.preferences.to_cookie())
        .body(rendered.html)
}

pub async fn gallery_script() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/javascript; charset=utf-8")
        .body(GALLERY_SCRIPT)
}

#[derive(Debug, Deserialize)]
pub struct ThemeForm {
    pub theme: String,
}

#[instrument(skip(req, form))]
pub async fn set_theme(req: HttpRequest, form: web::Form<ThemeForm>) -> HttpResponse {
    let mut preferences = Preferences::from_request(&req);
    if let Ok(theme) = form.theme.parse::<Theme>() {
        preferences.theme = theme;
    }

    redirect_back(&req)
        .cookie(preferences.to_cookie())
        .finish()
}

pub async fn accept_consent(req: HttpRequest) -> HttpResponse {
    record_consent(&req, Consent::Accepted)
}

pub async fn decline_consent(req: HttpRequest) -> HttpResponse {
    record_consent(&req, Consent::Declined)
}

fn record_consent(req: &HttpRequest, consent: Consent) -> HttpResponse {
    debug!(consent = consent.as_str(), "Cookie consent recorded");
    redirect_back(req).cookie(consent.to_cookie()).finish()
}

/// 303 to the page named by `Referer`, or home. Only known site pages are followed.
fn redirect_back(req: &HttpRequest) -> actix_web::HttpResponseBuilder {
    let target = req
        .headers()
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|referer| url::Url::parse(referer).ok())
        .and_then(|url| {
            let filename = url.path().trim_start_matches('/');
            Page::detect(filename)?;
            Some(match url.query() {
                Some(q) => format!("/{filename}?{q}"),
                None => format!("/{filename}"),
            })
        })
        .unwrap_or_else(|| format!("/{}", Page::Home.filename()));

    let mut builder = HttpResponse::SeeOther();
    builder.insert_header((header::LOCATION, target));
    builder
}
