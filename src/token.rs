//! Signed session token encoding and verification.
//!
//! Tokens are a stateless transport for a session id: a compact JWT carrying
//! the session id and the session's own expiry, signed with the process-wide
//! secret. The algorithm is pinned to HS256 on both ends; the token's own
//! header is never consulted for algorithm selection.

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Claims embedded in a signed session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Session id
    pub sid: String,
    /// Expiration time (Unix timestamp), mirrors the session's expiry
    pub exp: u64,
}

/// Errors from token operations.
#[derive(Debug)]
pub enum TokenError {
    /// Error encoding the token
    Encoding(jsonwebtoken::errors::Error),
    /// The token failed verification. Bad signature, malformed structure and
    /// expired claims all collapse here so callers cannot probe the reason.
    Invalid,
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenError::Encoding(e) => write!(f, "Failed to encode token: {}", e),
            TokenError::Invalid => write!(f, "Invalid token"),
        }
    }
}

impl std::error::Error for TokenError {}

/// Signs and verifies session tokens with a shared secret.
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
        }
    }

    /// Sign a token for a session. The expiry claim is the session's own
    /// expiry, so the token outlives neither the session nor vice versa.
    pub fn sign(&self, session_id: &str, expires_at: u64) -> Result<String, TokenError> {
        let claims = SessionClaims {
            sid: session_id.to_string(),
            exp: expires_at,
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(TokenError::Encoding)
    }

    /// Verify a token's signature and expiry claim.
    pub fn verify(&self, token: &str) -> Result<SessionClaims, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        jsonwebtoken::decode::<SessionClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn now() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs()
    }

    #[test]
    fn test_sign_and_verify() {
        let codec = TokenCodec::new(b"test-secret-key-for-testing");

        let token = codec.sign("session-abc", now() + 600).unwrap();
        let claims = codec.verify(&token).unwrap();

        assert_eq!(claims.sid, "session-abc");
    }

    #[test]
    fn test_wrong_secret_never_verifies() {
        let signer = TokenCodec::new(b"secret-1");
        let verifier = TokenCodec::new(b"secret-2");

        let token = signer.sign("session-abc", now() + 600).unwrap();
        assert!(matches!(verifier.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_expired_claim_rejected() {
        let codec = TokenCodec::new(b"test-secret");

        let token = codec.sign("session-abc", now() - 50).unwrap();
        assert!(matches!(codec.verify(&token), Err(TokenError::Invalid)));
    }

    #[test]
    fn test_garbage_rejected() {
        let codec = TokenCodec::new(b"test-secret");

        assert!(matches!(codec.verify(""), Err(TokenError::Invalid)));
        assert!(matches!(
            codec.verify("not.a.token"),
            Err(TokenError::Invalid)
        ));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let codec = TokenCodec::new(b"test-secret");

        let token = codec.sign("session-abc", now() + 600).unwrap();
        let mut parts: Vec<&str> = token.split('.').collect();
        let other = codec.sign("session-xyz", now() + 600).unwrap();
        let other_parts: Vec<&str> = other.split('.').collect();
        // Splice the payload of one token into the signature of another
        parts[1] = other_parts[1];
        let spliced = parts.join(".");

        assert!(matches!(codec.verify(&spliced), Err(TokenError::Invalid)));
    }
}
