use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::utils::error::AppError;

/// Validity of every issued access token.
pub const TOKEN_TTL_HOURS: i64 = 72;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    pub iat: usize, // issued at
    pub exp: usize, // expiration
}

/// Identity resolved by the access guard and attached to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: ObjectId,
}

/// Signs and verifies stateless HS256 bearer tokens.
#[derive(Clone)]
pub struct SessionIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl SessionIssuer {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn issue(&self, user_id: &ObjectId) -> Result<String, AppError> {
        self.issue_at(user_id, Utc::now())
    }

    fn issue_at(&self, user_id: &ObjectId, now: DateTime<Utc>) -> Result<String, AppError> {
        let claims = Claims {
            user_id: user_id.to_hex(),
            iat: now.timestamp() as usize,
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AppError::internal(format!("Failed to generate token: {}", e)))
    }

    /// Checks signature and expiry and resolves the embedded account id.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::unauthenticated(format!("Invalid token: {}", e)))?;

        let user_id = ObjectId::parse_str(&claims.user_id)
            .map_err(|_| AppError::unauthenticated("Invalid token subject"))?;

        Ok(AuthenticatedUser { user_id })
    }
}

/// Extracts the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}
