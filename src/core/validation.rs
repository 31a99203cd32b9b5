//! Form field validation shared by the core operations.
//!
//! Field rules (lengths, email syntax, ranges) are declared on the form
//! structs with `validator` attributes and reach callers as
//! [`Error::Validation`] through `From<ValidationErrors>`. This module keeps
//! input normalisation and the checks the derive cannot express.

use crate::errors::{Error, Result};

/// Trims surrounding whitespace in place.
pub fn trim(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Trims in place; blank input becomes `None`.
pub fn trim_optional(value: &mut Option<String>) {
    *value = value
        .take()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());
}

/// Digits with an optional leading `+`, spaces or dashes.
///
/// Length is enforced by the form's `length(max = 15)` rule.
pub fn phone(value: &str) -> Result<()> {
    let body_ok = value
        .chars()
        .enumerate()
        .all(|(i, c)| c.is_ascii_digit() || c == ' ' || c == '-' || (i == 0 && c == '+'));
    if body_ok && value.chars().any(|c| c.is_ascii_digit()) {
        Ok(())
    } else {
        Err(Error::validation("Enter a valid phone number."))
    }
}

/// Money amounts must be finite and non-negative.
pub fn amount(value: f64) -> Result<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(Error::InvalidAmount { amount: value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim() {
        let mut name = "  Ada  ".to_string();
        trim(&mut name);
        assert_eq!(name, "Ada");

        let mut blank = Some("   ".to_string());
        trim_optional(&mut blank);
        assert_eq!(blank, None);

        let mut notes = Some(" hi ".to_string());
        trim_optional(&mut notes);
        assert_eq!(notes.as_deref(), Some("hi"));
    }

    #[test]
    fn test_phone() {
        assert!(phone("+254 700-111").is_ok());
        assert!(phone("call me").is_err());
        assert!(phone("12+34").is_err());
        assert!(phone("--").is_err());
    }

    #[test]
    fn test_amount() {
        assert!(amount(0.0).is_ok());
        assert!(amount(-1.0).is_err());
        assert!(amount(f64::NAN).is_err());
    }
}
