use actix_web::web;

mod api;
mod json_error;
mod site;

pub use json_error::INVALID_JSON_MESSAGE;

/// Mounts the content API under `api_base` and the site at the root.
pub fn configure_routes(cfg: &mut web::ServiceConfig, api_base: &str) {
    cfg.service(
        web::scope(api_base)
            .configure(json_error::config_routes)
            .configure(api::config_routes),
    );

    cfg.configure(site::config_routes);
}
