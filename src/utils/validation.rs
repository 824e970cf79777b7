use crate::utils::error::AppError;

/// Request payloads that check their own field constraints before touching the database.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

pub fn require_non_empty(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} should not be empty", field)));
    }
    Ok(())
}

pub fn optional_non_empty(field: &str, value: Option<&str>) -> Result<(), AppError> {
    match value {
        Some(value) => require_non_empty(field, value),
        None => Ok(()),
    }
}

pub fn require_email(field: &str, value: &str) -> Result<(), AppError> {
    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && domain.contains('.')
                && !value.chars().any(char::is_whitespace)
                && !domain.contains('@')
        }
        None => false,
    };

    if !valid {
        return Err(AppError::Validation(format!("{} must be an email", field)));
    }
    Ok(())
}

pub fn require_url(field: &str, value: &str) -> Result<(), AppError> {
    let invalid = || AppError::Validation(format!("{} must be a URL address", field));

    let url = reqwest::Url::parse(value).map_err(|_| invalid())?;
    let web_scheme = matches!(url.scheme(), "http" | "https");
    if !web_scheme || url.host_str().map_or(true, str::is_empty) {
        return Err(invalid());
    }
    Ok(())
}

pub fn require_min_len(field: &str, value: &str, min: usize) -> Result<(), AppError> {
    if value.chars().count() < min {
        return Err(AppError::Validation(format!(
            "{} must be longer than or equal to {} characters",
            field, min
        )));
    }
    Ok(())
}

pub fn require_range(field: &str, value: i64, min: i64, max: i64) -> Result<(), AppError> {
    if value < min || value > max {
        return Err(AppError::Validation(format!(
            "{} must be between {} and {}",
            field, min, max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_validation() {
        assert!(require_email("email", "student@uni.lk").is_ok());
        assert!(require_email("email", "a.b+c@mail.example.com").is_ok());
        assert!(require_email("email", "no-at-sign").is_err());
        assert!(require_email("email", "@domain.com").is_err());
        assert!(require_email("email", "user@localhost").is_err());
        assert!(require_email("email", "user@.com").is_err());
        assert!(require_email("email", "us er@mail.com").is_err());
    }

    #[test]
    fn test_url_validation() {
        assert!(require_url("website", "https://acme.io").is_ok());
        assert!(require_url("website", "http://localhost:3000/x").is_ok());
        assert!(require_url("website", "ftp://acme.io").is_err());
        assert!(require_url("website", "https://").is_err());
        assert!(require_url("website", "mailto:hr@acme.io").is_err());
        assert!(require_url("website", "acme.io").is_err());
    }

    #[test]
    fn test_url_validation_rejects_malformed_hosts() {
        for value in ["http://exa mple.com", "https://[::1", "http://a:b:c:d", "http://<script>"] {
            assert!(require_url("logo", value).is_err(), "{} should be rejected", value);
        }
        assert!(require_url("linkedin", "https://www.linkedin.com/in/someone?trk=1").is_ok());
        assert!(require_url("profile_picture", "https://[::1]:8080/avatar.png").is_ok());
    }

    #[test]
    fn test_range_and_length() {
        assert!(require_range("rating", 5, 1, 5).is_ok());
        assert!(require_range("rating", 0, 1, 5).is_err());
        assert!(require_range("rating", 6, 1, 5).is_err());
        assert!(require_min_len("password", "secret", 6).is_ok());
        assert!(require_min_len("password", "short", 6).is_err());
        assert!(require_non_empty("title", "   ").is_err());
    }
}
