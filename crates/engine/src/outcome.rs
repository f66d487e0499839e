//! Result type shared by every field validator.

use serde::Serialize;

/// Why a value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionKind {
    /// The value does not parse (email, number, time, date phrase).
    Syntax,
    /// The value parses but breaks a business rule (domain, range, hours).
    Domain,
    /// The date or time has already elapsed.
    Past,
    /// The location or cuisine is not one we serve.
    Unsupported,
}

/// A user-facing rejection: one per failed turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rejection {
    pub kind: RejectionKind,
    pub message: String,
}

/// Outcome of validating one field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ValidationOutcome {
    /// Accepted. `value` is canonical; `display` keeps the user's phrasing
    /// when it differs in a way worth echoing back (dates).
    Valid {
        value: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        display: Option<String>,
    },
    Invalid(Rejection),
}

impl ValidationOutcome {
    pub fn valid(value: impl Into<String>) -> Self {
        ValidationOutcome::Valid {
            value: value.into(),
            display: None,
        }
    }

    pub fn valid_with_display(value: impl Into<String>, display: impl Into<String>) -> Self {
        ValidationOutcome::Valid {
            value: value.into(),
            display: Some(display.into()),
        }
    }

    pub fn invalid(kind: RejectionKind, message: impl Into<String>) -> Self {
        ValidationOutcome::Invalid(Rejection {
            kind,
            message: message.into(),
        })
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid { .. })
    }

    /// Canonical value, if accepted.
    pub fn value(&self) -> Option<&str> {
        match self {
            ValidationOutcome::Valid { value, .. } => Some(value),
            ValidationOutcome::Invalid(_) => None,
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            ValidationOutcome::Valid { .. } => None,
            ValidationOutcome::Invalid(rejection) => Some(rejection),
        }
    }

    /// The text shown to the user: the canonical value or the rejection message.
    pub fn message(&self) -> &str {
        match self {
            ValidationOutcome::Valid { value, .. } => value,
            ValidationOutcome::Invalid(rejection) => &rejection.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_tagged() {
        let ok = serde_json::to_value(ValidationOutcome::valid("19:00")).unwrap();
        assert_eq!(ok, serde_json::json!({ "outcome": "valid", "value": "19:00" }));

        let bad = serde_json::to_value(ValidationOutcome::invalid(
            RejectionKind::Past,
            "too late",
        ))
        .unwrap();
        assert_eq!(
            bad,
            serde_json::json!({ "outcome": "invalid", "kind": "past", "message": "too late" })
        );
    }
}
