//! HMAC-SHA256 verification of compact bearer tokens.
//!
//! Used when no upstream gateway verifies tokens for the service. The shared
//! secret is zeroised when the verifier is dropped.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use hmac::{Hmac, Mac};
use mockable::Clock;
use serde::Deserialize;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::domain::TokenClaims;
use crate::domain::ports::{TokenVerificationError, TokenVerifier};

type HmacSha256 = Hmac<Sha256>;

const ALGORITHM: &str = "HS256";

#[derive(Deserialize)]
struct Header {
    alg: String,
}

/// [`TokenVerifier`] checking HS256 signatures and the `exp` claim.
pub struct Hs256TokenVerifier {
    secret: Zeroizing<Vec<u8>>,
    clock: Arc<dyn Clock>,
    leeway_secs: i64,
}

impl Hs256TokenVerifier {
    /// Allowed clock skew when checking `exp`.
    pub const DEFAULT_LEEWAY_SECS: i64 = 30;

    /// Create a verifier for `secret`.
    pub fn new(secret: Zeroizing<Vec<u8>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            secret,
            clock,
            leeway_secs: Self::DEFAULT_LEEWAY_SECS,
        }
    }

    fn check_signature(&self, token: &str) -> Result<(), TokenVerificationError> {
        let (signed, signature) = token
            .rsplit_once('.')
            .ok_or_else(|| TokenVerificationError::malformed("missing signature segment"))?;
        let (header, _payload) = signed
            .split_once('.')
            .ok_or_else(|| TokenVerificationError::malformed("missing payload segment"))?;

        let header_bytes = URL_SAFE_NO_PAD
            .decode(header)
            .map_err(|_| TokenVerificationError::malformed("header is not base64url"))?;
        let header: Header = serde_json::from_slice(&header_bytes)
            .map_err(|_| TokenVerificationError::malformed("header is not a JSON object"))?;
        if header.alg != ALGORITHM {
            return Err(TokenVerificationError::unsupported_algorithm(header.alg));
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature)
            .map_err(|_| TokenVerificationError::malformed("signature is not base64url"))?;
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .map_err(|_| TokenVerificationError::malformed("secret cannot key HMAC"))?;
        mac.update(signed.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenVerificationError::bad_signature())
    }
}

#[async_trait]
impl TokenVerifier for Hs256TokenVerifier {
    async fn verify(&self, token: &str) -> Result<(), TokenVerificationError> {
        let token = token.trim();
        self.check_signature(token)?;

        let claims = TokenClaims::decode(token)
            .map_err(|err| TokenVerificationError::malformed(err.to_string()))?;
        if let Some(expires_at) = claims.expires_at() {
            if self.clock.utc().timestamp() > expires_at.saturating_add(self.leeway_secs) {
                return Err(TokenVerificationError::expired());
            }
        }
        Ok(())
    }
}
