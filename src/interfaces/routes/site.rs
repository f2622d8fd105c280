use actix_web::web;

use crate::handlers::{pages, system};

/// Pages and their helpers. The catch-all page route comes last.
pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(system::health_check)
        .service(system::root_redirect)
        .service(web::resource("/assets/gallery.js").route(web::get().to(pages::gallery_script)))
        .service(web::resource("/preferences/theme").route(web::post().to(pages::set_theme)))
        .service(web::resource("/consent/accept").route(web::post().to(pages::accept_consent)))
        .service(web::resource("/consent/decline").route(web::post().to(pages::decline_consent)))
        .service(web::resource("/{filename}").route(web::get().to(pages::render)));
}
