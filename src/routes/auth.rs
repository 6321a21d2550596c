use actix_web::web;

use crate::handlers::auth;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/login/admin", web::post().to(auth::login_admin))
            .route("/login/mechanic", web::post().to(auth::login_mechanic))
            .route("/verify", web::get().to(auth::verify))
            .route("/change-password", web::post().to(auth::change_password)),
    );
}
