use pageflow_preview::{PreviewError, generate_token, validate, validate_token};
use pretty_assertions::assert_eq;

const KEY: &str = "secret";
const KEY_TOKEN: &str =
    "jsg5fpbrfeMK4lm8oH3sgM6pI/68chUE5oIu+hZh898goGGtyzj4+SzuG/oG4LKAdnZX7U5KbUgknf2LgmkigA==";

// ── Generation ───────────────────────────────────────────────────

#[test]
fn token_matches_known_vector() {
    assert_eq!(generate_token(KEY).as_str(), KEY_TOKEN);
}

#[test]
fn token_is_deterministic() {
    assert_eq!(generate_token(KEY), generate_token(KEY));
}

#[test]
fn different_keys_give_different_tokens() {
    assert_ne!(generate_token(KEY), generate_token("other"));
}

#[test]
fn empty_key_still_hashes() {
    assert_eq!(
        generate_token("").as_str(),
        "kZnnuZJdC/Nn6ct7TZhXLQS00xWaQyfa1fvo/h5O4LEJpN2DlYv+sr3EvfpQDHjQdIcQ+m/9md5SaNBpIDSnUw=="
    );
}

#[test]
fn token_is_base64_of_512_bits() {
    let token = generate_token(KEY);
    // 64 bytes -> 88 base64 chars with padding
    assert_eq!(token.as_str().len(), 88);
    assert!(token.as_str().ends_with("=="));
}

// ── Validation ───────────────────────────────────────────────────

#[test]
fn validate_accepts_generated_token() {
    let token = generate_token(KEY);
    assert_eq!(validate_token(Some(token.as_str()), KEY), Ok(()));
}

#[test]
fn validate_rejects_missing_token() {
    assert_eq!(validate_token(None, KEY), Err(PreviewError::MissingToken));
    assert_eq!(validate_token(Some(""), KEY), Err(PreviewError::MissingToken));
}

#[test]
fn validate_rejects_wrong_token() {
    let other = generate_token("other");
    assert_eq!(
        validate_token(Some(other.as_str()), KEY),
        Err(PreviewError::InvalidToken)
    );
}

#[test]
fn validate_accepts_spaces_in_place_of_plus() {
    let mangled = KEY_TOKEN.replace('+', " ");
    assert!(mangled.contains(' '));
    assert_eq!(validate_token(Some(&mangled), KEY), Ok(()));
}

#[test]
fn validate_rejects_truncated_token() {
    let truncated = &KEY_TOKEN[..KEY_TOKEN.len() - 1];
    assert_eq!(
        validate_token(Some(truncated), KEY),
        Err(PreviewError::InvalidToken)
    );
}

// ── Structured response ──────────────────────────────────────────

#[test]
fn structured_success() {
    let result = validate(Some(KEY_TOKEN), KEY);
    assert!(result.is_ok());
    assert!(!result.error);
    assert_eq!(result.message, None);
}

#[test]
fn structured_missing() {
    let result = validate(None, KEY);
    assert!(result.error);
    assert_eq!(result.message.as_deref(), Some("Missing preview key."));
}

#[test]
fn structured_invalid() {
    let result = validate(Some("nope"), KEY);
    assert!(result.error);
    assert_eq!(result.message.as_deref(), Some("Invalid preview key."));
}

#[test]
fn structured_serializes_error_and_message() {
    let json = serde_json::to_value(validate(None, KEY)).unwrap();
    assert_eq!(json, serde_json::json!({"error": true, "message": "Missing preview key."}));
}
