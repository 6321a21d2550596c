use actix_web::{web, HttpResponse};
use bcrypt::{hash, DEFAULT_COST};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::{require_admin, require_self_or_admin, Claims};
use crate::database::models::{
    CreateMechanicRequest, MechanicInfo, MechanicStatus, UpdateMechanicRequest,
};
use crate::database::repositories::MechanicRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct MechanicListQuery {
    pub status: Option<String>,
}

/// Create a mechanic account (admin only)
pub async fn create_mechanic(
    claims: Claims,
    repo: web::Data<MechanicRepository>,
    input: web::Json<CreateMechanicRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&claims)?;

    if input.password.len() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    if repo.username_exists(&input.username).await? {
        return Err(AppError::Conflict("Username is already in use".to_string()));
    }

    if repo.email_in_use(&input.email, None).await? {
        return Err(AppError::Conflict("Email is already in use".to_string()));
    }

    let password_hash = hash(&input.password, DEFAULT_COST)?;
    let mechanic = repo.create(&input, &password_hash).await?;

    Ok(HttpResponse::Created().json(ApiResponse::success(MechanicInfo::from(mechanic))))
}

/// List mechanics, optionally filtered by status (admin only)
pub async fn get_mechanics(
    claims: Claims,
    repo: web::Data<MechanicRepository>,
    query: web::Query<MechanicListQuery>,
) -> Result<HttpResponse, AppError> {
    require_admin(&claims)?;

    let status = query
        .status
        .as_deref()
        .map(|s| s.parse::<MechanicStatus>())
        .transpose()
        .map_err(AppError::Validation)?;

    let mechanics: Vec<MechanicInfo> = repo
        .list(status)
        .await?
        .into_iter()
        .map(MechanicInfo::from)
        .collect();

    Ok(HttpResponse::Ok().json(ApiResponse::success(mechanics)))
}

/// Get one mechanic (self or admin)
pub async fn get_mechanic(
    claims: Claims,
    repo: web::Data<MechanicRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let mechanic_id = path.into_inner();
    require_self_or_admin(&claims, mechanic_id)?;

    let mechanic = repo
        .find_by_id(mechanic_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Mechanic not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(MechanicInfo::from(mechanic))))
}

/// Partially update a mechanic (admin only)
pub async fn update_mechanic(
    claims: Claims,
    repo: web::Data<MechanicRepository>,
    path: web::Path<Uuid>,
    input: web::Json<UpdateMechanicRequest>,
) -> Result<HttpResponse, AppError> {
    require_admin(&claims)?;
    let mechanic_id = path.into_inner();

    if let Some(email) = &input.email {
        if repo.email_in_use(email, Some(mechanic_id)).await? {
            return Err(AppError::Conflict(
                "Email is already in use by another mechanic".to_string(),
            ));
        }
    }

    let mechanic = repo
        .update(mechanic_id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound("Mechanic not found".to_string()))?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(MechanicInfo::from(mechanic))))
}

/// Delete a mechanic (admin only). Refused while jobs reference them;
/// deactivate instead.
pub async fn delete_mechanic(
    claims: Claims,
    repo: web::Data<MechanicRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    require_admin(&claims)?;
    let mechanic_id = path.into_inner();

    if repo.has_jobs(mechanic_id).await? {
        return Err(AppError::Conflict(
            "Mechanic has recorded jobs and cannot be deleted. Set their status to inactive instead."
                .to_string(),
        ));
    }

    if !repo.delete(mechanic_id).await? {
        return Err(AppError::NotFound("Mechanic not found".to_string()));
    }

    Ok(HttpResponse::Ok().json(ApiResponse::<()>::success_with_message(
        None,
        "Mechanic deleted successfully",
    )))
}

/// Lifetime job statistics for a mechanic (self or admin)
pub async fn get_mechanic_stats(
    claims: Claims,
    repo: web::Data<MechanicRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let mechanic_id = path.into_inner();
    require_self_or_admin(&claims, mechanic_id)?;

    repo.find_by_id(mechanic_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Mechanic not found".to_string()))?;

    let stats = repo.stats(mechanic_id).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(stats)))
}
