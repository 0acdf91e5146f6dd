pub mod protected;
pub mod public;

use std::collections::HashMap;
use std::str::FromStr;

use crate::error::ApiError;

/// Validation error for a single field, in the shape clients expect.
pub(crate) fn field_error(field: &'static str, message: impl Into<String>) -> ApiError {
    let mut field_errors = HashMap::new();
    field_errors.insert(field.to_string(), message.into());
    ApiError::validation_error("Invalid request", Some(field_errors))
}

/// Parse a literal-set field, converting a bad literal into a field-level
/// validation error.
pub(crate) fn parse_field<T>(field: &'static str, value: &str) -> Result<T, ApiError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| field_error(field, e.to_string()))
}

pub(crate) fn require_present(field: &'static str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(field_error(field, "This field is required"));
    }
    Ok(())
}

/// progress and weightage are percentages.
pub(crate) fn require_percent(field: &'static str, value: i32) -> Result<(), ApiError> {
    if !(0..=100).contains(&value) {
        return Err(field_error(field, "must be between 0 and 100"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::subject::SubjectStatus;

    #[test]
    fn parse_field_maps_bad_literals_to_validation_errors() {
        let err = parse_field::<SubjectStatus>("status", "finished").unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert_eq!(err.to_json()["field_errors"]["status"],
            "unsupported value 'finished' (expected one of: strong, pending, weak, completed)");
    }

    #[test]
    fn require_present_rejects_blank_strings() {
        assert!(require_present("name", "  ").is_err());
        assert!(require_present("name", "Maths").is_ok());
    }

    #[test]
    fn require_percent_bounds() {
        assert!(require_percent("progress", -1).is_err());
        assert!(require_percent("progress", 101).is_err());
        assert!(require_percent("progress", 0).is_ok());
        assert!(require_percent("progress", 100).is_ok());
    }
}
