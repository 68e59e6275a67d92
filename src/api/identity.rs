use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::config::Config;

/// Name of the signed identity cookie.
pub const AUTH_COOKIE: &str = "auth_token";

/// How long an issued identity token stays valid. Expiry just means the
/// browser is handed a fresh identity on its next visit.
const TOKEN_VALIDITY_DAYS: i64 = 365;

/// Owner identity for the current request, placed into request
/// extensions by the identity middleware.
#[derive(Debug, Clone)]
pub struct OwnerId(pub String);

#[derive(Debug, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies the signed owner-identity cookie (HS256 JWT).
pub struct IdentityService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl IdentityService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let secret = if config.auth.secret.is_empty() {
            warn!("Auth secret not configured, generating a random one; identity cookies will not survive restarts");
            Uuid::new_v4().simple().to_string()
        } else {
            config.auth.secret.clone()
        };

        Self::new(&secret)
    }

    /// Mint an identity for a browser seen for the first time.
    pub fn new_owner_id(&self) -> String {
        Uuid::new_v4().to_string()
    }

    pub fn generate_token(&self, owner_id: &str) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = IdentityClaims {
            sub: owner_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_VALIDITY_DAYS)).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }

    /// Verify a presented token and extract the owner id. Any failure
    /// (tampering, expiry, garbage) means the browser gets a fresh
    /// identity instead of an error.
    pub fn verify_token(&self, token: &str) -> Option<String> {
        decode::<IdentityClaims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims.sub)
            .ok()
    }
}
