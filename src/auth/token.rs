//! Signed session tokens.
//!
//! A session is an HS256 JWT naming the user. It is handed to the browser in
//! a cookie, or presented as a bearer token.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::{Result, YatubeError};

/// The authenticated user behind a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
}

impl Identity {
    pub fn new(user_id: i64, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }
}

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID).
    pub sub: i64,
    /// Username.
    pub username: String,
    /// Issued at timestamp.
    pub iat: u64,
    /// Expiration timestamp.
    pub exp: u64,
    /// JWT ID (unique identifier).
    pub jti: String,
}

impl From<SessionClaims> for Identity {
    fn from(claims: SessionClaims) -> Self {
        Identity::new(claims.sub, claims.username)
    }
}

/// Issues and verifies session tokens.
#[derive(Clone)]
pub struct SessionTokens {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    expiry_secs: u64,
}

impl SessionTokens {
    /// Create a token issuer from a secret key.
    pub fn new(secret: &str, expiry_secs: u64) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            expiry_secs,
        }
    }

    /// Session lifetime in seconds.
    pub fn expiry_secs(&self) -> u64 {
        self.expiry_secs
    }

    /// Issue a token for a user.
    pub fn issue(&self, identity: &Identity) -> Result<String> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        let claims = SessionClaims {
            sub: identity.user_id,
            username: identity.username.clone(),
            iat: now,
            exp: now + self.expiry_secs,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| YatubeError::Auth(format!("failed to encode session token: {e}")))
    }

    /// Verify a token and return the identity it names.
    pub fn verify(&self, token: &str) -> Result<Identity> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| YatubeError::Auth(format!("invalid session token: {e}")))?;
        Ok(token_data.claims.into())
    }
}

impl std::fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionTokens")
            .field("expiry_secs", &self.expiry_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leo() -> Identity {
        Identity::new(1, "leo")
    }

    #[test]
    fn test_issue_and_verify() {
        let tokens = SessionTokens::new("test-secret", 3600);
        let token = tokens.issue(&leo()).unwrap();

        assert_eq!(tokens.verify(&token).unwrap(), leo());
    }

    #[test]
    fn test_tokens_are_unique() {
        let tokens = SessionTokens::new("test-secret", 3600);
        assert_ne!(tokens.issue(&leo()).unwrap(), tokens.issue(&leo()).unwrap());
    }

    #[test]
    fn test_expired_token() {
        let secret = "test-secret";
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = SessionClaims {
            sub: 1,
            username: "leo".to_string(),
            iat: now - 7200,
            exp: now - 3600, // Expired 1 hour ago
            jti: uuid::Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap();

        let result = SessionTokens::new(secret, 3600).verify(&token);
        assert!(matches!(result, Err(YatubeError::Auth(_))));
    }

    #[test]
    fn test_invalid_secret() {
        let token = SessionTokens::new("secret1", 3600).issue(&leo()).unwrap();
        assert!(SessionTokens::new("secret2", 3600).verify(&token).is_err());
    }

    #[test]
    fn test_garbage_token() {
        let tokens = SessionTokens::new("test-secret", 3600);
        assert!(tokens.verify("not.a.token").is_err());
        assert!(tokens.verify("").is_err());
    }
}
