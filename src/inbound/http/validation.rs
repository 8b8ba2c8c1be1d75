//! Shared validation helpers for inbound HTTP adapters.
//!
//! Field presence and simple size bounds are checked here, at the transport
//! edge; business rules (normalization, ranges against the clock) live in
//! the domain.

use serde_json::json;

use crate::domain::Error;

/// Longest description the API accepts.
pub(crate) const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Reject a request missing a required field.
pub(crate) fn missing_field_error(field: &str) -> Error {
    Error::invalid_format(format!("{field} is required")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

/// Enforce the description size bound when the field is present.
pub(crate) fn validate_description(description: &str) -> Result<(), Error> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(Error::invalid_format(format!(
            "description must be at most {MAX_DESCRIPTION_LENGTH} characters"
        ))
        .with_details(json!({
            "field": "description",
            "code": "too_long",
            "maxLength": MAX_DESCRIPTION_LENGTH,
        })));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    fn missing_field_names_the_field() {
        let error = missing_field_error("discountValue");
        assert_eq!(error.code(), ErrorCode::InvalidFormat);
        assert_eq!(
            error.details().and_then(|d| d["field"].as_str()),
            Some("discountValue")
        );
    }

    #[rstest]
    fn description_at_bound_is_accepted() {
        let description = "x".repeat(MAX_DESCRIPTION_LENGTH);
        assert!(validate_description(&description).is_ok());
    }

    #[rstest]
    fn description_over_bound_is_rejected() {
        let description = "x".repeat(MAX_DESCRIPTION_LENGTH + 1);
        let error = validate_description(&description).expect_err("too long");
        assert_eq!(error.code(), ErrorCode::InvalidFormat);
    }
}
