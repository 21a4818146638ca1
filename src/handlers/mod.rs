use actix_web::web;

use crate::utils::validation;

pub mod department;
pub mod employee;

/// Method and path of every route, logged at startup.
pub const ENDPOINTS: [(&str, &str); 5] = [
    ("GET", "/api/employees"),
    ("GET", "/api/departments"),
    ("POST", "/api/employees"),
    ("PUT", "/api/employees/{id}"),
    ("DELETE", "/api/employees/{id}"),
];

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(validation::json_config())
        .service(
            web::resource("/api/employees")
                .route(web::get().to(employee::get_employees))
                .route(web::post().to(employee::create_employee)),
        )
        .service(
            web::resource("/api/employees/{id}")
                .route(web::put().to(employee::update_employee))
                .route(web::delete().to(employee::delete_employee)),
        )
        .service(
            web::resource("/api/departments")
                .route(web::get().to(department::get_departments)),
        );
}
