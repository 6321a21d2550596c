use actix_web::{dev::Payload, web::Data, FromRequest, HttpRequest};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use uuid::Uuid;

use crate::config::Config;
use crate::database::models::{AuthResponse, Role, UserInfo};
use crate::database::repositories::{AdminRepository, MechanicRepository};
use crate::error::AppError;

/// The authenticated principal carried inside every credential. Expiry is
/// the only invalidation mechanism; there is no revocation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub exp: usize,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_mechanic(&self) -> bool {
        self.role == Role::Mechanic
    }

    pub fn user_id(&self) -> Uuid {
        self.sub
    }
}

impl FromRequest for Claims {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "));

        let (Some(token), Some(config)) = (token, req.app_data::<Data<Config>>()) else {
            return ready(Err(AppError::Unauthorized));
        };

        ready(decode_token(token, &config.jwt_secret))
    }
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )?;

    Ok(token_data.claims)
}

/// Admin-only policy: any valid credential with the admin role.
pub fn require_admin(claims: &Claims) -> Result<(), AppError> {
    if claims.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden("Admin role required".to_string()))
    }
}

/// Self-or-admin policy: admins pass, mechanics pass only for resources
/// they own.
pub fn require_self_or_admin(claims: &Claims, owner_id: Uuid) -> Result<(), AppError> {
    if claims.is_admin() || claims.user_id() == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "You do not have access to this resource".to_string(),
        ))
    }
}

#[derive(Clone)]
pub struct AuthService {
    admin_repository: AdminRepository,
    mechanic_repository: MechanicRepository,
    config: Config,
}

impl AuthService {
    pub fn new(
        admin_repository: AdminRepository,
        mechanic_repository: MechanicRepository,
        config: Config,
    ) -> Self {
        Self {
            admin_repository,
            mechanic_repository,
            config,
        }
    }

    pub async fn login_admin(&self, username: &str, password: &str) -> Result<AuthResponse, AppError> {
        let admin = self
            .admin_repository
            .find_by_username(username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify(password, &admin.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let user = UserInfo::from(admin);
        let token = self.generate_token(&user)?;

        Ok(AuthResponse { token, user })
    }

    pub async fn login_mechanic(
        &self,
        username: &str,
        password: &str,
    ) -> Result<AuthResponse, AppError> {
        let mechanic = self
            .mechanic_repository
            .find_by_username(username)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !mechanic.is_active() {
            return Err(AppError::Forbidden(
                "Your account is inactive. Contact an administrator.".to_string(),
            ));
        }

        if !verify(password, &mechanic.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let user = UserInfo::from(mechanic);
        let token = self.generate_token(&user)?;

        Ok(AuthResponse { token, user })
    }

    pub async fn change_password(
        &self,
        claims: &Claims,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AppError> {
        if new_password.len() < 6 {
            return Err(AppError::Validation(
                "New password must be at least 6 characters".to_string(),
            ));
        }

        let current_hash = match claims.role {
            Role::Admin => {
                self.admin_repository
                    .find_by_id(claims.sub)
                    .await?
                    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?
                    .password_hash
            }
            Role::Mechanic => {
                self.mechanic_repository
                    .find_by_id(claims.sub)
                    .await?
                    .ok_or_else(|| AppError::NotFound("User not found".to_string()))?
                    .password_hash
            }
        };

        if !verify(current_password, &current_hash)? {
            return Err(AppError::Unauthorized);
        }

        let new_hash = hash(new_password, DEFAULT_COST)?;

        match claims.role {
            Role::Admin => {
                self.admin_repository
                    .update_password(claims.sub, &new_hash)
                    .await?
            }
            Role::Mechanic => {
                self.mechanic_repository
                    .update_password(claims.sub, &new_hash)
                    .await?
            }
        }

        Ok(())
    }

    pub fn generate_token(&self, user: &UserInfo) -> Result<String, AppError> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::hours(self.config.jwt_expiration_hours))
            .ok_or_else(|| AppError::Internal(Some("Invalid expiry timestamp".to_string())))?
            .timestamp() as usize;

        let claims = Claims {
            sub: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
            role: user.role,
            exp: expiration,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )
        .map_err(|e| AppError::Internal(Some(e.to_string())))?;

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mechanic_claims(id: Uuid) -> Claims {
        Claims {
            sub: id,
            username: "mgarcia".to_string(),
            email: "mgarcia@example.com".to_string(),
            role: Role::Mechanic,
            exp: (Utc::now().timestamp() + 3600) as usize,
        }
    }

    fn admin_claims() -> Claims {
        Claims {
            sub: Uuid::new_v4(),
            username: "boss".to_string(),
            email: "boss@example.com".to_string(),
            role: Role::Admin,
            exp: (Utc::now().timestamp() + 3600) as usize,
        }
    }

    fn sign(claims: &Claims, secret: &str) -> String {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(secret.as_ref()),
        )
        .unwrap()
    }

    #[test]
    fn token_round_trips() {
        let claims = admin_claims();
        let token = sign(&claims, "secret");

        let decoded = decode_token(&token, "secret").unwrap();
        assert_eq!(decoded.sub, claims.sub);
        assert_eq!(decoded.username, claims.username);
        assert_eq!(decoded.role, Role::Admin);
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut claims = admin_claims();
        claims.exp = (Utc::now().timestamp() - 3600) as usize;
        let token = sign(&claims, "secret");

        let err = decode_token(&token, "secret").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn token_signed_with_other_key_is_rejected() {
        let token = sign(&admin_claims(), "secret");

        let err = decode_token(&token, "a-different-secret").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(matches!(
            decode_token("not.a.token", "secret"),
            Err(AppError::Unauthorized)
        ));
    }

    #[test]
    fn admin_passes_every_policy() {
        let claims = admin_claims();
        assert!(require_admin(&claims).is_ok());
        assert!(require_self_or_admin(&claims, Uuid::new_v4()).is_ok());
    }

    #[test]
    fn mechanic_is_denied_admin_only() {
        let claims = mechanic_claims(Uuid::new_v4());
        assert!(matches!(
            require_admin(&claims),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn mechanic_passes_self_or_admin_only_for_own_resources() {
        let own_id = Uuid::new_v4();
        let claims = mechanic_claims(own_id);

        assert!(require_self_or_admin(&claims, own_id).is_ok());
        assert!(matches!(
            require_self_or_admin(&claims, Uuid::new_v4()),
            Err(AppError::Forbidden(_))
        ));
    }
}
