use super::ApiError;

/// Pull a required field out of a request body, rejecting absent or blank
/// values. Serde leaves missing optional fields as `None`; turning that into
/// a 400 here keeps the handlers shaped as "require, then call the service".
pub fn require_field(value: Option<String>, field: &str) -> Result<String, ApiError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ApiError::validation(format!("{} is required", field))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_field_present() {
        assert_eq!(
            require_field(Some("value".to_string()), "email").unwrap(),
            "value"
        );
    }

    #[test]
    fn test_require_field_missing() {
        assert!(require_field(None, "email").is_err());
        assert!(require_field(Some(String::new()), "email").is_err());
        assert!(require_field(Some("   ".to_string()), "email").is_err());
    }
}
