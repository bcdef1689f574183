use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuthError;
use crate::session::{Role, Session};

/// Claims carried by an access token issued by the survey API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub role: String,
    pub exp: u64,
    #[serde(default)]
    pub iat: u64,
    #[serde(default)]
    pub email: Option<String>,
}

/// Validate an HS256 access token and return its claims.
pub fn validate_token(token: &str, decoding_key: &DecodingKey) -> Result<SessionClaims, AuthError> {
    if token.trim().is_empty() {
        return Err(AuthError::InvalidToken("empty token".to_string()));
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;

    let token_data = decode::<SessionClaims>(token, decoding_key, &validation)?;
    Ok(token_data.claims)
}

/// Validate `token` and turn its claims into a [`Session`] carrying it.
pub fn session_from_token(token: &str, decoding_key: &DecodingKey) -> Result<Session, AuthError> {
    let claims = validate_token(token, decoding_key)?;
    let role: Role = claims.role.parse()?;
    debug!(user = %claims.sub, role = %role, "session established");

    let mut session = Session::new(claims.sub, role, token);
    session.email = claims.email;
    Ok(session)
}
