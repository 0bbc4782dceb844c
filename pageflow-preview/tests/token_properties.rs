//! Property tests for preview tokens.
//!
//! - Generation is deterministic per key
//! - A generated token always validates, also with `+` sent as space
//! - Any single-character change is rejected

use pageflow_preview::{PreviewError, generate_token, validate_token};
use proptest::prelude::*;

fn key_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9!@#$%^&*()_-]{0,64}").unwrap()
}

const BASE64_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/=";

proptest! {
    #[test]
    fn generation_is_idempotent(key in key_strategy()) {
        prop_assert_eq!(generate_token(&key), generate_token(&key));
    }

    #[test]
    fn generated_token_validates(key in key_strategy()) {
        let token = generate_token(&key);
        prop_assert_eq!(validate_token(Some(token.as_str()), &key), Ok(()));
    }

    #[test]
    fn plus_as_space_validates(key in key_strategy()) {
        let token = generate_token(&key);
        let mangled = token.as_str().replace('+', " ");
        prop_assert_eq!(validate_token(Some(&mangled), &key), Ok(()));
    }

    #[test]
    fn single_char_mutation_fails(
        key in key_strategy(),
        position in 0usize..88,
        replacement in 0usize..BASE64_ALPHABET.len(),
    ) {
        let token = generate_token(&key);
        let mut bytes = token.as_str().as_bytes().to_vec();
        let new_byte = BASE64_ALPHABET[replacement];
        prop_assume!(bytes[position] != new_byte);
        bytes[position] = new_byte;
        let mutated = String::from_utf8(bytes).unwrap();

        prop_assert_eq!(
            validate_token(Some(&mutated), &key),
            Err(PreviewError::InvalidToken)
        );
    }
}
