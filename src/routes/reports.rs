use actix_web::web;

use crate::handlers::reports;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/reports")
            .route("/weekly", web::get().to(reports::weekly_summary))
            .route(
                "/weekly/mechanic/{mechanic_id}",
                web::get().to(reports::mechanic_weekly_summary),
            )
            .route(
                "/weekly/close/{mechanic_id}",
                web::post().to(reports::close_week),
            )
            .route(
                "/payments/mechanic/{mechanic_id}",
                web::get().to(reports::payment_history),
            )
            .route(
                "/payments/{payment_id}/mark-paid",
                web::patch().to(reports::mark_paid),
            ),
    );
}
