use anyhow::Result;
use std::env;

const DEFAULT_JWT_SECRET: &str = "change-this-secret-before-deploying-anywhere-real";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration_hours: i64,
    pub host: String,
    pub port: u16,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://@localhost:5432/workshop".to_string()),
            jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string()),
            jwt_expiration_hours: env::var("JWT_EXPIRATION_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .unwrap_or(24),
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        };

        config.validate()
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// The fallback development secret must never sign production tokens.
    fn validate(self) -> Result<Self> {
        if self.is_production() && self.jwt_secret == DEFAULT_JWT_SECRET {
            anyhow::bail!("JWT_SECRET must be set explicitly when ENVIRONMENT=production");
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(environment: &str, jwt_secret: &str) -> Config {
        Config {
            database_url: "postgres://@localhost:5432/workshop".to_string(),
            jwt_secret: jwt_secret.to_string(),
            jwt_expiration_hours: 24,
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: environment.to_string(),
        }
    }

    #[test]
    fn production_refuses_the_default_jwt_secret() {
        assert!(config("production", DEFAULT_JWT_SECRET).validate().is_err());
        assert!(config("production", "a-real-deployment-secret")
            .validate()
            .is_ok());
    }

    #[test]
    fn development_tolerates_the_default_jwt_secret() {
        assert!(config("development", DEFAULT_JWT_SECRET).validate().is_ok());
    }
}
