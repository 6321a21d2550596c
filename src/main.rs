use actix_cors::Cors;
use actix_web::{get, middleware::Logger, web, App, HttpResponse, HttpServer, Responder};
use anyhow::Result;

use workshop_be::database::{
    init_database,
    repositories::{AdminRepository, JobRepository, MechanicRepository, WeeklyPaymentRepository},
};
use workshop_be::services::{ReportService, SettlementService};
use workshop_be::{AuthService, Config};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Workshop Ledger API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    log::info!("Starting Workshop Ledger API server...");

    // Load configuration
    let config = Config::from_env()?;
    log::info!("Configuration loaded (environment: {})", config.environment);

    // Initialize database
    let pool = init_database(&config.database_url).await?;
    log::info!("Database initialized");

    // Initialize repositories and services
    let admin_repository = AdminRepository::new(pool.clone());
    let mechanic_repository = MechanicRepository::new(pool.clone());
    let job_repository = JobRepository::new(pool.clone());
    let payment_repository = WeeklyPaymentRepository::new(pool.clone());

    let auth_service = AuthService::new(
        admin_repository.clone(),
        mechanic_repository.clone(),
        config.clone(),
    );
    let settlement_service = SettlementService::new(
        mechanic_repository.clone(),
        job_repository.clone(),
        payment_repository.clone(),
    );
    let report_service = ReportService::new(mechanic_repository.clone(), job_repository.clone());

    let mechanic_repo_data = web::Data::new(mechanic_repository);
    let job_repo_data = web::Data::new(job_repository);
    let payment_repo_data = web::Data::new(payment_repository);
    let auth_service_data = web::Data::new(auth_service);
    let settlement_service_data = web::Data::new(settlement_service);
    let report_service_data = web::Data::new(report_service);
    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    log::info!("Server starting on http://{}", server_address);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(mechanic_repo_data.clone())
            .app_data(job_repo_data.clone())
            .app_data(payment_repo_data.clone())
            .app_data(auth_service_data.clone())
            .app_data(settlement_service_data.clone())
            .app_data(report_service_data.clone())
            .app_data(config_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin("http://localhost:3000")
                    .allowed_methods(vec!["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS"])
                    .allowed_headers(vec!["Authorization", "Content-Type", "Accept"])
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .service(hello)
            .service(health)
            .configure(workshop_be::routes::configure)
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
