//! Preview access for pageflow.
//!
//! This crate handles:
//! - Deterministic preview token generation from the site security key
//! - Validation of tokens supplied with preview requests
//! - The preview handshake query (`previewkey`, `ContentID`) and the redirect
//!   URL that hands it to the preview route
//!
//! # Token Format
//!
//! The token is `base64(sha512(wide("-1_{securityKey}_Preview")))` where
//! `wide` emits every UTF-16 code unit as its low byte followed by a zero
//! byte. The layout is fixed by the content service and must not change.

mod error;
mod request;
mod token;

pub use error::{PreviewError, PreviewResult};
pub use request::{PREVIEW_KEY_PARAM, PreviewRequest};
pub use token::{PreviewToken, PreviewValidation, generate_token, validate, validate_token};
