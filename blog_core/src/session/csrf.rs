//! CSRF token derivation and verification
//!
//! The CSRF token is an HMAC of the session token under the server secret, so
//! it needs no storage and expires together with the session. Verification is
//! a pure comparison independent of session verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::session::errors::SessionError;
use crate::utils::base64url_encode;

type HmacSha256 = Hmac<Sha256>;

const CSRF_DOMAIN: &[u8] = b"blog-csrf-v1:";

/// Header carrying the CSRF token on state-changing requests.
pub const CSRF_HEADER_NAME: &str = "X-CSRF-Token";

pub(crate) fn derive_csrf_token(secret: &[u8], session_token: &str) -> Result<String, SessionError> {
    let mut mac = HmacSha256::new_from_slice(secret)
        .map_err(|e| SessionError::Crypto(format!("Invalid HMAC key: {e}")))?;
    mac.update(CSRF_DOMAIN);
    mac.update(session_token.as_bytes());
    Ok(base64url_encode(&mac.finalize().into_bytes()))
}

/// Check a client-supplied CSRF token against the expected one.
///
/// Absent or empty tokens never match.
pub fn verify_csrf_token(expected: &str, supplied: Option<&str>) -> bool {
    match supplied {
        Some(supplied) if !supplied.is_empty() && !expected.is_empty() => {
            supplied.as_bytes().ct_eq(expected.as_bytes()).into()
        }
        _ => false,
    }
}

/// Whether `method` changes server state and therefore needs a CSRF token.
pub fn is_state_changing(method: &http::Method) -> bool {
    matches!(
        *method,
        http::Method::POST | http::Method::PUT | http::Method::PATCH | http::Method::DELETE
    )
}
