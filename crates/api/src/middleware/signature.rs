//! Teams outgoing-webhook signature verification.
//!
//! Teams signs each request body with HMAC-SHA256 using the webhook's shared secret and sends
//! the digest in the `Authorization` header, optionally tagged `HMAC <digest>`. Verification
//! fails closed: no secret, no header or any computation error all mean "not authentic".
//!
//! [`SignedBody`] wraps the check in an Axum extractor so handlers only ever see verified bytes.

use axum::body::Bytes;
use axum::extract::{FromRequest, Request};
use axum::http::header::AUTHORIZATION;
use axum::response::{IntoResponse, Response};
use hmac::{Hmac, Mac};
use sha2::Sha256;

use relay_common::error::AppError;

use crate::state::AppState;

type HmacSha256 = Hmac<Sha256>;

const SCHEME_PREFIX: &str = "HMAC ";

/// Sign a payload with HMAC-SHA256 and return the lowercase hex digest.
///
/// Returns `None` only if the key is rejected by the MAC implementation.
pub fn sign_body(secret: &str, body: &[u8]) -> Option<String> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).ok()?;
    mac.update(body);
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Verify `signature_header` against `body` using `shared_secret`.
pub fn verify_signature(
    body: &[u8],
    signature_header: Option<&str>,
    shared_secret: Option<&str>,
) -> bool {
    let Some(secret) = shared_secret.filter(|s| !s.is_empty()) else {
        tracing::error!("No shared secret configured; rejecting request");
        return false;
    };

    let Some(header) = signature_header else {
        tracing::warn!("Request has no Authorization header");
        return false;
    };
    let provided = header.strip_prefix(SCHEME_PREFIX).unwrap_or(header);

    let Some(expected) = sign_body(secret, body) else {
        tracing::error!("Failed to initialise HMAC with the shared secret");
        return false;
    };

    tracing::debug!(provided_len = provided.len(), "Comparing request signature");
    constant_time_eq(expected.as_bytes(), provided.as_bytes())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.len() == b.len() && a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Raw request body that passed signature verification.
///
/// When `require_signature` is disabled every body is accepted unchecked.
#[derive(Debug, Clone)]
pub struct SignedBody(pub Bytes);

impl FromRequest<AppState> for SignedBody {
    type Rejection = Response;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let signature = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let body = Bytes::from_request(req, state)
            .await
            .map_err(IntoResponse::into_response)?;

        if state.config.require_signature
            && !verify_signature(
                &body,
                signature.as_deref(),
                state.config.teams_outgoing_token.as_deref(),
            )
        {
            tracing::error!("Signature verification failed");
            return Err(AppError::Auth("Unauthorized".to_string()).into_response());
        }

        Ok(SignedBody(body))
    }
}
