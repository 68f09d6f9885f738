//! Environment configuration
//!
//! Reads the process environment (after `.env` has been loaded by `dotenvy`)
//! into an `EnvironmentConfig`. Required values that are missing produce an
//! `AppError::Config` instead of a panic.

use std::env;
use std::str::FromStr;

use crate::utils::errors::AppError;

/// Environment configuration
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_max_connections: u32,
    pub database_acquire_timeout_secs: u64,
    pub run_migrations: bool,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub auth_cookie_name: String,
    pub cors_origins: Vec<String>,
}

impl EnvironmentConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self {
            environment: var_or("ENVIRONMENT", "development"),
            host: var_or("HOST", "0.0.0.0"),
            port: parse_var("PORT", 3000)?,
            database_url: required_var("DATABASE_URL")?,
            database_max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 10)?,
            database_acquire_timeout_secs: parse_var("DATABASE_ACQUIRE_TIMEOUT_SECS", 5)?,
            run_migrations: parse_var("RUN_MIGRATIONS", false)?,
            jwt_secret: required_var("JWT_SECRET")?,
            jwt_expiration: parse_var("JWT_EXPIRATION", 86_400)?,
            auth_cookie_name: var_or("AUTH_COOKIE_NAME", "token"),
            cors_origins: split_origins(&env::var("CORS_ORIGINS").unwrap_or_default()),
        })
    }

    /// Are we running in development mode
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Are we running in production mode
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Address the server binds to
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn required_var(name: &str) -> Result<String, AppError> {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Config(format!("{} must be set", name)))
}

fn parse_var<T: FromStr>(name: &str, default: T) -> Result<T, AppError> {
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Config(format!("{} has an invalid value: '{}'", name, raw))),
        _ => Ok(default),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed() {
        assert_eq!(
            split_origins("http://localhost:3001, https://app.truxtok.com ,"),
            vec!["http://localhost:3001", "https://app.truxtok.com"]
        );
        assert!(split_origins("").is_empty());
    }

    #[test]
    fn parse_var_falls_back_and_rejects_garbage() {
        env::set_var("TRUXTOK_TEST_PORT_OK", "8080");
        env::set_var("TRUXTOK_TEST_PORT_BAD", "eighty");
        assert_eq!(parse_var::<u16>("TRUXTOK_TEST_PORT_OK", 1).unwrap(), 8080);
        assert_eq!(parse_var::<u16>("TRUXTOK_TEST_PORT_MISSING", 1).unwrap(), 1);
        assert!(parse_var::<u16>("TRUXTOK_TEST_PORT_BAD", 1).is_err());
    }

    #[test]
    fn required_var_reports_name() {
        let err = required_var("TRUXTOK_TEST_DEFINITELY_UNSET").unwrap_err();
        assert!(err.to_string().contains("TRUXTOK_TEST_DEFINITELY_UNSET"));
    }
}
