// ABOUTME: Bearer credential decoding and caller identity extraction
// ABOUTME: Validates the role claim and subject before any pipeline stage runs
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Bazaar Labs

//! Access guard
//!
//! Decodes the bearer token's claims segment locally and checks that the
//! caller carries the authenticated role and a subject identifier. No network
//! access is needed. Claims are decoded without verifying the token signature;
//! the storefront's identity issuer is trusted implicitly. See DESIGN.md for
//! the recorded decision on signature verification.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::Deserialize;

use crate::errors::{AppError, AppResult};

/// Role claim value that marks a signed-in storefront user
const AUTHENTICATED_ROLE: &str = "authenticated";

/// Claims carried in the token payload segment
#[derive(Debug, Deserialize)]
struct TokenClaims {
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    role: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

/// Identity of an authenticated caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Subject identifier from the token
    pub user_id: String,
    /// Email claim if present
    pub email: Option<String>,
}

/// Decode and validate a bearer credential
///
/// Accepts either a raw token or a full `Bearer <token>` header value.
///
/// # Errors
///
/// Returns `Unauthorized` on wrong segment count, undecodable or non-JSON
/// payload, a missing/empty subject, or a role other than `authenticated`.
pub fn authenticate_bearer(credential: &str) -> AppResult<AuthenticatedUser> {
    let token = credential
        .strip_prefix("Bearer ")
        .unwrap_or(credential)
        .trim();

    if token.is_empty() {
        return Err(AppError::auth_invalid("Missing bearer token"));
    }

    let claims = decode_claims(token)?;

    let role = claims.role.as_deref().unwrap_or_default();
    if role != AUTHENTICATED_ROLE {
        return Err(AppError::auth_invalid("Caller is not authenticated"));
    }

    let user_id = claims
        .sub
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| AppError::auth_invalid("Token is missing a subject"))?;

    Ok(AuthenticatedUser {
        user_id,
        email: claims.email,
    })
}

/// Decode the claims segment of a three-part token
fn decode_claims(token: &str) -> AppResult<TokenClaims> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(AppError::auth_invalid("Malformed bearer token"));
    };

    let decoded = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| AppError::auth_invalid("Malformed token payload"))?;

    serde_json::from_slice(&decoded)
        .map_err(|_| AppError::auth_invalid("Token payload is not valid JSON"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;

    fn make_token(claims: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string().as_bytes());
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn accepts_authenticated_user() {
        let token = make_token(&json!({
            "sub": "user-42",
            "role": "authenticated",
            "email": "a@b.example"
        }));
        let user = authenticate_bearer(&format!("Bearer {token}")).unwrap();
        assert_eq!(user.user_id, "user-42");
        assert_eq!(user.email.as_deref(), Some("a@b.example"));
    }

    #[test]
    fn rejects_anon_role() {
        let token = make_token(&json!({ "sub": "user-42", "role": "anon" }));
        let err = authenticate_bearer(&token).unwrap_err();
        assert_eq!(err.code, crate::errors::ErrorCode::Unauthorized);
    }

    #[test]
    fn rejects_missing_subject() {
        let token = make_token(&json!({ "role": "authenticated" }));
        assert!(authenticate_bearer(&token).is_err());

        let token = make_token(&json!({ "sub": "  ", "role": "authenticated" }));
        assert!(authenticate_bearer(&token).is_err());
    }

    #[test]
    fn rejects_wrong_segment_count() {
        assert!(authenticate_bearer("only-one-segment").is_err());
        assert!(authenticate_bearer("a.b").is_err());
        assert!(authenticate_bearer("a.b.c.d").is_err());
    }

    #[test]
    fn rejects_non_json_payload() {
        let payload = URL_SAFE_NO_PAD.encode(b"not json");
        assert!(authenticate_bearer(&format!("h.{payload}.s")).is_err());
    }

    #[test]
    fn rejects_empty_token() {
        assert!(authenticate_bearer("").is_err());
        assert!(authenticate_bearer("Bearer ").is_err());
    }
}
