//! `Authorization` header parsing.
//!
//! Services build their request extractors on top of [`token_from_headers`];
//! the token is not validated here.

use http::{HeaderMap, header::AUTHORIZATION};

/// Accepted authorization schemes, compared case-insensitively.
pub const TOKEN_SCHEMES: [&str; 2] = ["Token", "Bearer"];

/// The `Authorization` header is present but is not `<scheme> <token>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("malformed authorization header")]
pub struct MalformedHeader;

/// Take the raw token from `Authorization: Token <token>` (or `Bearer <token>`).
///
/// `Ok(None)` when the header is absent.
pub fn token_from_headers(headers: &HeaderMap) -> Result<Option<String>, MalformedHeader> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Ok(None);
    };
    let value = value.to_str().map_err(|_| MalformedHeader)?;
    let (scheme, token) = value.trim().split_once(' ').ok_or(MalformedHeader)?;
    let token = token.trim();
    if token.is_empty()
        || !TOKEN_SCHEMES
            .iter()
            .any(|known| known.eq_ignore_ascii_case(scheme))
    {
        return Err(MalformedHeader);
    }
    Ok(Some(token.to_owned()))
}
