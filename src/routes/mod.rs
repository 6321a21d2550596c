use actix_web::web;

pub mod auth;
pub mod jobs;
pub mod mechanics;
pub mod reports;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(auth::configure)
            .configure(mechanics::configure)
            .configure(jobs::configure)
            .configure(reports::configure),
    );
}
