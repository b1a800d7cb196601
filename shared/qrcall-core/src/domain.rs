//! Core domain types shared by the codec, the dispatcher and the HTTP layer

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::error::{QrCallError, Result};

/// Label used when the generator leaves it blank
pub const DEFAULT_LABEL: &str = "Unknown Contact";

/// Target of the placeholder intent used by the demo fallback
pub const PLACEHOLDER_NUMBER: &str = "+1234567890";

/// Label of the placeholder intent used by the demo fallback
pub const PLACEHOLDER_LABEL: &str = "Demo Contact";

/// Digits, optional leading `+`, spaces, parentheses and hyphens
const PHONE_PATTERN: &str = r"^\+?[\d\s\-\(\)]+$";

fn phone_regex() -> &'static Regex {
    static PHONE_RE: OnceLock<Regex> = OnceLock::new();
    PHONE_RE.get_or_init(|| Regex::new(PHONE_PATTERN).expect("phone pattern is a valid regex"))
}

/// Permissive phone number check. No E.164 normalisation is attempted.
pub fn is_valid_phone_number(value: &str) -> bool {
    phone_regex().is_match(value)
}

/// Validate a phone number supplied by a client.
///
/// `field` names the input in the error message ("Phone number", "Your phone number").
pub fn validate_phone_number(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(QrCallError::Validation(format!("{} is required", field)));
    }
    if !is_valid_phone_number(value) {
        return Err(QrCallError::Validation(format!("Invalid {} format", field.to_lowercase())));
    }
    Ok(())
}

/// Mask every digit that is followed by at least four more consecutive digits.
///
/// `+14155550000` becomes `+*******0000`.
pub fn mask_phone_number(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    chars
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let followed_by_four = chars.len() > i + 4
                && chars[i + 1..=i + 4].iter().all(|d| d.is_ascii_digit());
            if c.is_ascii_digit() && followed_by_four {
                '*'
            } else {
                *c
            }
        })
        .collect()
}

/// The (target number, label) pair a call token represents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallIntent {
    pub target_number: String,
    pub label: String,
    /// Advisory only, never enforced as an expiry
    pub created_at: DateTime<Utc>,
}

impl CallIntent {
    pub fn new(target_number: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            target_number: target_number.into(),
            label: label.into(),
            created_at: Utc::now(),
        }
    }

    /// Build an intent from generator input, substituting the default label
    /// for a missing or blank one.
    pub fn from_request(target_number: &str, label: Option<&str>) -> Self {
        let label = label
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .unwrap_or(DEFAULT_LABEL);
        Self::new(target_number.trim(), label)
    }

    /// The fixed intent substituted for undecodable tokens in placeholder mode
    pub fn placeholder() -> Self {
        Self::new(PLACEHOLDER_NUMBER, PLACEHOLDER_LABEL)
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn is_placeholder(&self) -> bool {
        self.target_number == PLACEHOLDER_NUMBER && self.label == PLACEHOLDER_LABEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone_pattern_accepts_common_formats() {
        for number in ["+14155550000", "4155550000", "+1 (415) 555-0000", "020 7946 0958"] {
            assert!(is_valid_phone_number(number), "{} should be accepted", number);
        }
    }

    #[test]
    fn test_phone_pattern_rejects_garbage() {
        for number in ["", "abc", "+1415x5550000", "++14155550000", "1415555_0000"] {
            assert!(!is_valid_phone_number(number), "{} should be rejected", number);
        }
    }

    #[test]
    fn test_validate_phone_number_messages() {
        let missing = validate_phone_number("Phone number", "  ").unwrap_err();
        assert_eq!(missing.to_string(), "Phone number is required");

        let malformed = validate_phone_number("Phone number", "call me").unwrap_err();
        assert_eq!(malformed.to_string(), "Invalid phone number format");

        assert!(validate_phone_number("Phone number", "+14155550000").is_ok());
    }

    #[test]
    fn test_mask_phone_number() {
        assert_eq!(mask_phone_number("+14155550000"), "+*******0000");
        assert_eq!(mask_phone_number("1234"), "1234");
        // Separators break the run of digits
        assert_eq!(mask_phone_number("+1 (415) 555-0000"), "+1 (415) 555-0000");
    }

    #[test]
    fn test_intent_default_label() {
        assert_eq!(CallIntent::from_request("+14155550000", None).label, DEFAULT_LABEL);
        assert_eq!(CallIntent::from_request("+14155550000", Some("   ")).label, DEFAULT_LABEL);
        assert_eq!(CallIntent::from_request("+14155550000", Some("Alice")).label, "Alice");
    }

    #[test]
    fn test_placeholder_intent() {
        let intent = CallIntent::placeholder();
        assert_eq!(intent.target_number, "+1234567890");
        assert_eq!(intent.label, "Demo Contact");
        assert!(intent.is_placeholder());
        assert!(!CallIntent::new("+14155550000", "Alice").is_placeholder());
    }

    #[test]
    fn test_intent_serializes_camel_case() {
        let json = serde_json::to_value(CallIntent::new("+14155550000", "Alice")).unwrap();
        assert_eq!(json["targetNumber"], "+14155550000");
        assert_eq!(json["label"], "Alice");
        assert!(json["createdAt"].is_string());
    }
}
