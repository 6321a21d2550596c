use actix_web::{web, HttpResponse};

use crate::auth::{AuthService, Claims};
use crate::database::models::{ChangePasswordRequest, LoginRequest};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;

/// Administrator login
pub async fn login_admin(
    auth_service: web::Data<AuthService>,
    input: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let response = auth_service
        .login_admin(&input.username, &input.password)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Mechanic login; inactive accounts are refused
pub async fn login_mechanic(
    auth_service: web::Data<AuthService>,
    input: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let response = auth_service
        .login_mechanic(&input.username, &input.password)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Echo the principal behind a valid credential.
pub async fn verify(claims: Claims) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(serde_json::json!({
        "id": claims.sub,
        "username": claims.username,
        "email": claims.email,
        "role": claims.role,
    }))))
}

pub async fn change_password(
    claims: Claims,
    auth_service: web::Data<AuthService>,
    input: web::Json<ChangePasswordRequest>,
) -> Result<HttpResponse, AppError> {
    auth_service
        .change_password(&claims, &input.current_password, &input.new_password)
        .await?;

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_with_message(
        None,
        "Password updated successfully",
    )))
}
