//! Password hashing and bearer-token issuance/verification (Part B §B3,
//! §B5). Authentication itself is outside the algorithmic core (spec
//! §1) — the core only ever consumes the `user_id` this module resolves.

mod middleware;

pub use middleware::{auth_middleware, AuthUser};

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::OrchestratorConfig;
use crate::error::OrchestratorError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub login: String,
    pub iss: String,
    pub exp: i64,
}

pub fn hash_password(password: &str) -> Result<String, OrchestratorError> {
    let salt = SaltString::generate(&mut rand_core_compat::OsRng);
    let argon2 = Argon2::default();
    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| OrchestratorError::Hash(e.to_string()))
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool, OrchestratorError> {
    let parsed = PasswordHash::new(hash).map_err(|e| OrchestratorError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub fn issue_token(
    config: &OrchestratorConfig,
    user_id: i64,
    login: &str,
) -> Result<String, OrchestratorError> {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        login: login.to_string(),
        iss: config.jwt_issuer.clone(),
        exp: now + config.jwt_expiry_secs,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )
    .map_err(OrchestratorError::Token)
}

pub fn verify_token(config: &OrchestratorConfig, token: &str) -> Result<Claims, OrchestratorError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[&config.jwt_issuer]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .map_err(OrchestratorError::Token)?;

    Ok(data.claims)
}

/// `argon2`'s salt generator wants an `rand_core` `CryptoRngCore`; pull
/// it from the `password_hash` re-export so this module doesn't need its
/// own `rand` dependency.
mod rand_core_compat {
    pub use argon2::password_hash::rand_core::OsRng;
}
