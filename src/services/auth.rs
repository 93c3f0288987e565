use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur when verifying a caller identity
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

/// Claims carried by tokens issued by the external auth subsystem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: i64,
}

/// Verifier for the caller identity on mutating endpoints
///
/// Tokens are issued elsewhere (the account subsystem); this service only
/// decodes them and checks that the caller is the adopter they act for.
pub struct TokenVerifier {
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Decode the claims out of an `Authorization` header value
    pub fn verify(&self, authorization: Option<&str>) -> Result<Claims, AuthError> {
        let header = authorization.ok_or(AuthError::MissingToken)?;
        let token = header
            .strip_prefix("Bearer ")
            .ok_or(AuthError::MissingToken)?;

        let data = decode::<Claims>(token, &self.decoding, &self.validation)?;
        Ok(data.claims)
    }

    /// Check that the caller may act for the given adopter
    pub fn authorize_adopter(&self, claims: &Claims, adopter_id: Uuid) -> Result<(), AuthError> {
        if claims.role != "adopter" {
            return Err(AuthError::Forbidden(format!(
                "role '{}' may not manage matches",
                claims.role
            )));
        }
        if claims.sub != adopter_id.to_string() {
            return Err(AuthError::Forbidden(
                "token subject does not match the adopter".to_string(),
            ));
        }
        Ok(())
    }
}

/// Issue a token the verifier accepts; used by tests and local tooling
pub fn issue_token(
    secret: &str,
    subject: &str,
    role: &str,
    ttl_secs: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: subject.to_string(),
        role: role.to_string(),
        exp: chrono::Utc::now().timestamp() + ttl_secs,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}
