//! Preview token generation and checking.

use crate::error::{PreviewError, PreviewResult};
use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha512};
use std::fmt;

/// A preview token in its base64 text form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PreviewToken(String);

impl PreviewToken {
    /// Returns the token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks a supplied value against this token.
    ///
    /// Literal spaces are read back as `+`: query decoding turns an unescaped
    /// `+` into a space before the value gets here.
    #[must_use]
    pub fn matches(&self, supplied: &str) -> bool {
        let normalized = supplied.replace(' ', "+");
        constant_time_eq(normalized.as_bytes(), self.0.as_bytes())
    }
}

impl fmt::Display for PreviewToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PreviewToken {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Outcome of a validation, in the `{ error, message }` shape the preview
/// route responds with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviewValidation {
    pub error: bool,
    pub message: Option<String>,
}

impl PreviewValidation {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        !self.error
    }
}

impl From<PreviewResult<()>> for PreviewValidation {
    fn from(result: PreviewResult<()>) -> Self {
        match result {
            Ok(()) => Self {
                error: false,
                message: None,
            },
            Err(e) => Self {
                error: true,
                message: Some(e.to_string()),
            },
        }
    }
}

/// Generates the preview token for a security key. Deterministic.
#[must_use]
pub fn generate_token(security_key: &str) -> PreviewToken {
    let source = format!("-1_{security_key}_Preview");

    let mut hasher = Sha512::new();
    hasher.update(wide_bytes(&source));
    let digest = hasher.finalize();

    PreviewToken(BASE64.encode(digest))
}

/// Validates a supplied token against the security key.
pub fn validate_token(supplied: Option<&str>, security_key: &str) -> PreviewResult<()> {
    let supplied = supplied
        .filter(|s| !s.is_empty())
        .ok_or(PreviewError::MissingToken)?;

    if generate_token(security_key).matches(supplied) {
        Ok(())
    } else {
        Err(PreviewError::InvalidToken)
    }
}

/// [`validate_token`] folded into the structured response shape.
#[must_use]
pub fn validate(supplied: Option<&str>, security_key: &str) -> PreviewValidation {
    validate_token(supplied, security_key).into()
}

/// Each UTF-16 code unit becomes its low byte followed by a zero byte.
fn wide_bytes(s: &str) -> Vec<u8> {
    s.encode_utf16()
        .flat_map(|unit| [unit.to_le_bytes()[0], 0])
        .collect()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
