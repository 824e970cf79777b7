use std::env;

use crate::utils::error::AppError;

const DEFAULT_PDF_MAX_BYTES: usize = 5 * 1024 * 1024;

/// Google OAuth client credentials. Login via Google is disabled when absent.
#[derive(Debug, Clone)]
pub struct GoogleSettings {
    pub client_id: String,
    pub client_secret: String,
    pub callback_url: String,
}

/// Runtime configuration loaded from the environment (and `.env` via dotenv).
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub database_name: String,
    pub jwt_secret: String,
    pub jwt_issuer: String,
    pub jwt_expires_in_hours: i64,
    pub frontend_url: String,
    pub cors_origins: Vec<String>,
    pub cookie_secure: bool,
    pub google: Option<GoogleSettings>,
    pub pdf_max_bytes: usize,
}

impl Settings {
    pub fn from_env() -> Result<Self, AppError> {
        let database_url = required("DATABASE_URL")?;
        let database_name = env::var("DATABASE_NAME")
            .ok()
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| database_name_from_uri(&database_url));

        let frontend_url = env::var("FRONTEND_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        let cors_origins = env::var("CORS_ORIGINS")
            .map(|origins| split_origins(&origins))
            .unwrap_or_else(|_| vec![frontend_url.clone()]);

        let google = match (
            env::var("GOOGLE_CLIENT_ID"),
            env::var("GOOGLE_CLIENT_SECRET"),
            env::var("GOOGLE_CALLBACK_URL"),
        ) {
            (Ok(client_id), Ok(client_secret), Ok(callback_url)) => Some(GoogleSettings {
                client_id,
                client_secret,
                callback_url,
            }),
            _ => None,
        };

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("PORT", 3001)?,
            database_url,
            database_name,
            jwt_secret: required("JWT_SECRET")?,
            jwt_issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "industry-day-api".to_string()),
            jwt_expires_in_hours: parse_or("JWT_EXPIRES_IN_HOURS", 24)?,
            frontend_url,
            cors_origins,
            cookie_secure: parse_or("COOKIE_SECURE", false)?,
            google,
            pdf_max_bytes: parse_or("PDF_MAX_BYTES", DEFAULT_PDF_MAX_BYTES)?,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn required(key: &str) -> Result<String, AppError> {
    env::var(key)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Internal(format!("{} must be set", key)))
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Internal(format!("{} has an invalid value: {}", key, raw))),
        Err(_) => Ok(default),
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(String::from)
        .collect()
}

/// `mongodb://host:27017/industry_day?retryWrites=true` -> `industry_day`
fn database_name_from_uri(uri: &str) -> String {
    uri.split("://")
        .nth(1)
        .and_then(|rest| rest.split_once('/'))
        .map(|(_, path)| path.split('?').next().unwrap_or_default())
        .filter(|name| !name.is_empty())
        .unwrap_or("industry_day")
        .to_string()
}

#[cfg(test)]
pub fn test_settings() -> Settings {
    Settings {
        host: "127.0.0.1".to_string(),
        port: 3001,
        database_url: "mongodb://localhost:27017/industry_day_test".to_string(),
        database_name: "industry_day_test".to_string(),
        jwt_secret: "test-secret".to_string(),
        jwt_issuer: "industry-day-api".to_string(),
        jwt_expires_in_hours: 24,
        frontend_url: "http://localhost:3000".to_string(),
        cors_origins: vec!["http://localhost:3000".to_string()],
        cookie_secure: false,
        google: None,
        pdf_max_bytes: DEFAULT_PDF_MAX_BYTES,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_name_from_uri() {
        assert_eq!(database_name_from_uri("mongodb://localhost:27017/fair?w=majority"), "fair");
        assert_eq!(database_name_from_uri("mongodb+srv://u:p@cluster.example.net/events"), "events");
        assert_eq!(database_name_from_uri("mongodb://localhost:27017"), "industry_day");
        assert_eq!(database_name_from_uri("mongodb://localhost:27017/"), "industry_day");
    }

    #[test]
    fn test_split_origins() {
        assert_eq!(
            split_origins("http://a.test, http://b.test,,"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }
}
