//! Call token codec
//!
//! A token carries its call intent in the URL itself so the generate and
//! redeem requests never need shared storage:
//!
//! ```text
//! <b64url(target_number)>.<b64url(label)>.<created_at_ms>
//! ```
//!
//! Fields use URL-safe base64 without padding, whose alphabet never contains
//! the `.` delimiter. Tokens from the first deployment used standard base64
//! joined with `_` and are still accepted by [`decode`].

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use chrono::{DateTime, Utc};
use qrcall_core::{is_valid_phone_number, CallIntent};
use std::fmt;
use std::str::FromStr;

/// Separator between token fields
pub const DELIMITER: char = '.';

/// Separator used by first-generation tokens
const LEGACY_DELIMITER: char = '_';

/// Token field that failed to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenField {
    TargetNumber,
    Label,
}

impl fmt::Display for TokenField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TargetNumber => write!(f, "target number"),
            Self::Label => write!(f, "label"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("token has fewer than two parts")]
    MissingParts,

    #[error("{field} is not valid base64")]
    InvalidEncoding { field: TokenField },

    #[error("{field} is not valid UTF-8")]
    InvalidUtf8 { field: TokenField },

    #[error("target number is not a phone number")]
    InvalidTarget,
}

/// What to do with a token that does not decode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Surface an "invalid code" page
    #[default]
    Reject,
    /// Substitute the placeholder intent so the page always renders
    Placeholder,
}

impl FromStr for FallbackPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "placeholder" | "demo" => Ok(Self::Placeholder),
            other => Err(format!("unknown token fallback policy: {}", other)),
        }
    }
}

/// Encode a call intent, stamping it with the current time
pub fn encode(target_number: &str, label: &str) -> String {
    encode_at(target_number, label, Utc::now())
}

/// Encode a call intent with an explicit creation time
pub fn encode_at(target_number: &str, label: &str, created_at: DateTime<Utc>) -> String {
    format!(
        "{}{d}{}{d}{}",
        URL_SAFE_NO_PAD.encode(target_number),
        URL_SAFE_NO_PAD.encode(label),
        created_at.timestamp_millis(),
        d = DELIMITER,
    )
}

/// Recover the call intent carried by a token
pub fn decode(token: &str) -> Result<CallIntent, DecodeError> {
    let trimmed = token.trim();
    let legacy = !trimmed.contains(DELIMITER) && trimmed.contains(LEGACY_DELIMITER);

    // Query-string decoding turns '+' from standard base64 into a space, at
    // either end of the token too, so repair before trimming
    let repaired;
    let token = if legacy {
        repaired = token
            .trim_matches(|c: char| matches!(c, '\r' | '\n' | '\t'))
            .replace(' ', "+");
        repaired.as_str()
    } else {
        trimmed
    };

    let mut parts = token.split(if legacy { LEGACY_DELIMITER } else { DELIMITER });
    let (target_part, label_part) = match (parts.next(), parts.next()) {
        (Some(target), Some(label)) => (target, label),
        _ => return Err(DecodeError::MissingParts),
    };

    let target_number = decode_field(target_part, TokenField::TargetNumber, legacy)?;
    let label = decode_field(label_part, TokenField::Label, legacy)?;

    if !is_valid_phone_number(&target_number) {
        return Err(DecodeError::InvalidTarget);
    }

    let intent = CallIntent::new(target_number, label);
    Ok(match parts.next().and_then(parse_created_at) {
        Some(created_at) => intent.with_created_at(created_at),
        None => intent,
    })
}

/// Decode a token, substituting the placeholder intent on any failure
pub fn decode_or_placeholder(token: &str) -> CallIntent {
    decode(token).unwrap_or_else(|_| CallIntent::placeholder())
}

fn decode_field(part: &str, field: TokenField, legacy: bool) -> Result<String, DecodeError> {
    let decoded = if legacy {
        STANDARD.decode(part)
    } else {
        URL_SAFE_NO_PAD.decode(part)
    };

    let bytes = decoded.map_err(|_| DecodeError::InvalidEncoding { field })?;
    String::from_utf8(bytes).map_err(|_| DecodeError::InvalidUtf8 { field })
}

fn parse_created_at(part: &str) -> Option<DateTime<Utc>> {
    part.parse::<i64>().ok().and_then(DateTime::<Utc>::from_timestamp_millis)
}
