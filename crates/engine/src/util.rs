//! Internal helpers for model validation and conversion.
//!
//! These utilities are **not** part of the public API. They centralize
//! validation and mapping logic so the engine enforces consistent invariants.

use uuid::Uuid;

use crate::{EngineError, MoneyCents, ResultEngine};

/// Parse a UUID from storage and return a labeled error on failure.
pub(crate) fn parse_uuid(value: &str, label: &str) -> ResultEngine<Uuid> {
    Uuid::parse_str(value).map_err(|_| EngineError::Store(format!("invalid {label} id")))
}

/// Reject zero and negative amounts.
pub(crate) fn ensure_positive(amount: MoneyCents) -> ResultEngine<MoneyCents> {
    if !amount.is_positive() {
        return Err(EngineError::InvalidAmount(
            "Amount must be greater than zero".to_string(),
        ));
    }
    Ok(amount)
}

pub(crate) fn normalize_required_text(value: &str, label: &str) -> ResultEngine<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(EngineError::InvalidAmount(format!(
            "{label} must not be empty"
        )));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn normalize_optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn optional_text_drops_blank_values() {
        assert_eq!(normalize_optional_text(Some("  ")), None);
        assert_eq!(normalize_optional_text(None), None);
        assert_eq!(
            normalize_optional_text(Some(" lunch ")),
            Some("lunch".to_string())
        );
    }

    #[test]
    fn required_text_rejects_blank_values() {
        assert!(normalize_required_text(" ", "username").is_err());
        assert_eq!(normalize_required_text(" bob ", "username").unwrap(), "bob");
    }
}
