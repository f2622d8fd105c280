use actix_web::web;

use crate::handlers::{admin, contact, content, system};

pub fn config_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/get_skills.php").route(web::get().to(content::get_skills)))
        .service(
            web::resource("/get_skill_categories.php")
                .route(web::get().to(content::get_skill_categories)),
        )
        .service(web::resource("/get_education.php").route(web::get().to(content::get_education)))
        .service(web::resource("/get_experience.php").route(web::get().to(content::get_experience)))
        .service(web::resource("/get_projects.php").route(web::get().to(content::get_projects)))
        .service(web::resource("/get_gallery.php").route(web::get().to(content::get_gallery)))
        .service(web::resource("/get_about.php").route(web::get().to(content::get_about)))
        .service(
            web::resource("/get_personal_info.php").route(web::get().to(content::get_personal_info)),
        )
        .service(
            web::resource("/test_connection.php").route(web::get().to(system::test_connection)),
        );

    cfg.service(write_resource("/admin_skills.php").route(web::post().to(admin::add_skill)))
        .service(write_resource("/admin_education.php").route(web::post().to(admin::add_education)))
        .service(write_resource("/admin_experience.php").route(web::post().to(admin::add_experience)))
        .service(write_resource("/admin_projects.php").route(web::post().to(admin::add_project)))
        .service(write_resource("/add_photo.php").route(web::post().to(admin::add_photo)));

    cfg.service(
        web::resource("/contact-form.php")
            .route(web::post().to(contact::submit_contact_form))
            .default_service(web::to(contact::contact_method_not_allowed)),
    );
}

/// A write endpoint answering every non-POST method with the JSON 405 body.
fn write_resource(path: &str) -> actix_web::Resource {
    web::resource(path).default_service(web::to(admin::method_not_allowed))
}
