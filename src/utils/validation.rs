use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").expect("valid regex"));

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

pub fn validate_hex_color(field: &str, value: &str) -> AppResult<()> {
    if !HEX_COLOR.is_match(value) {
        return Err(AppError::ValidationError(format!(
            "{field} must be a hex colour like #1E40AF"
        )));
    }
    Ok(())
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// Empty strings are treated as "not provided".
pub fn validate_optional_email(value: Option<&str>) -> AppResult<()> {
    match value {
        Some(v) if !v.is_empty() && !is_valid_email(v) => Err(AppError::ValidationError(
            "email is not a valid address".to_string(),
        )),
        _ => Ok(()),
    }
}

/// Empty strings are treated as "not provided".
pub fn validate_optional_http_url(field: &str, value: Option<&str>) -> AppResult<()> {
    let Some(v) = value.filter(|v| !v.is_empty()) else {
        return Ok(());
    };
    match Url::parse(v) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(()),
        _ => Err(AppError::ValidationError(format!(
            "{field} must be an http(s) URL"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        assert!(validate_hex_color("primary", "#1E40AF").is_ok());
        assert!(validate_hex_color("primary", "#fff").is_ok());
        assert!(validate_hex_color("primary", "1E40AF").is_err());
        assert!(validate_hex_color("primary", "#12345").is_err());
        assert!(validate_hex_color("primary", "#GGGGGG").is_err());
    }

    #[test]
    fn test_optional_email() {
        assert!(validate_optional_email(None).is_ok());
        assert!(validate_optional_email(Some("")).is_ok());
        assert!(validate_optional_email(Some("ada@example.com")).is_ok());
        assert!(validate_optional_email(Some("ada.example.com")).is_err());
        assert!(validate_optional_email(Some("ada @example.com")).is_err());
    }

    #[test]
    fn test_optional_http_url() {
        assert!(validate_optional_http_url("linkedin", None).is_ok());
        assert!(validate_optional_http_url("linkedin", Some("")).is_ok());
        let linkedin = Some("https://linkedin.com/in/ada");
        assert!(validate_optional_http_url("linkedin", linkedin).is_ok());
        assert!(validate_optional_http_url("linkedin", Some("ftp://example.com/x")).is_err());
        assert!(validate_optional_http_url("linkedin", Some("linkedin.com/in/ada")).is_err());
    }
}
