use actix_web::web;

use crate::handlers::mechanics;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/mechanics")
            .route("", web::post().to(mechanics::create_mechanic))
            .route("", web::get().to(mechanics::get_mechanics))
            .route("/{id}", web::get().to(mechanics::get_mechanic))
            .route("/{id}", web::put().to(mechanics::update_mechanic))
            .route("/{id}", web::delete().to(mechanics::delete_mechanic))
            .route("/{id}/stats", web::get().to(mechanics::get_mechanic_stats)),
    );
}
