use actix_web::web;

use crate::handlers::jobs;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/jobs")
            .route("", web::post().to(jobs::create_job))
            .route("", web::get().to(jobs::get_jobs))
            .route("/daily-summary", web::get().to(jobs::daily_summary))
            .route(
                "/mechanic/{mechanic_id}",
                web::get().to(jobs::get_jobs_by_mechanic),
            )
            .route("/{id}", web::get().to(jobs::get_job))
            .route("/{id}", web::put().to(jobs::update_job))
            .route("/{id}/status", web::patch().to(jobs::update_job_status))
            .route("/{id}", web::delete().to(jobs::delete_job)),
    );
}
