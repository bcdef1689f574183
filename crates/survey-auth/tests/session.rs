use assert_matches::assert_matches;
use jsonwebtoken::{encode, get_current_timestamp, DecodingKey, EncodingKey, Header};
use survey_auth::error::AuthError;
use survey_auth::jwt::{session_from_token, SessionClaims};
use survey_auth::session::{Role, Session};

const SECRET: &[u8] = b"survey-desk-test-secret";

fn token_for(role: &str, exp: u64) -> String {
    let claims = SessionClaims {
        sub: "42".to_string(),
        role: role.to_string(),
        exp,
        iat: get_current_timestamp(),
        email: Some("prof@uni.example".to_string()),
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET)).unwrap()
}

#[test]
fn valid_token_yields_session() {
    let token = token_for("ROLE_TEACHER", get_current_timestamp() + 3600);
    let session = session_from_token(&token, &DecodingKey::from_secret(SECRET)).unwrap();

    assert_eq!(session.user_id, "42");
    assert_eq!(session.role, Role::Teacher);
    assert_eq!(session.email.as_deref(), Some("prof@uni.example"));
    assert_eq!(session.token(), token);
    assert_eq!(session.bearer(), format!("Bearer {token}"));
}

#[test]
fn expired_token_is_rejected() {
    let token = token_for("admin", get_current_timestamp() - 3600);
    let result = session_from_token(&token, &DecodingKey::from_secret(SECRET));
    assert_matches!(result, Err(AuthError::Jwt(_)));
}

#[test]
fn wrong_secret_is_rejected() {
    let token = token_for("admin", get_current_timestamp() + 3600);
    let result = session_from_token(&token, &DecodingKey::from_secret(b"other"));
    assert_matches!(result, Err(AuthError::Jwt(_)));
}

#[test]
fn unknown_role_is_rejected() {
    let token = token_for("janitor", get_current_timestamp() + 3600);
    let result = session_from_token(&token, &DecodingKey::from_secret(SECRET));
    assert_matches!(result, Err(AuthError::UnknownRole(_)));
}

#[test]
fn empty_token_is_rejected() {
    let result = session_from_token("  ", &DecodingKey::from_secret(SECRET));
    assert_matches!(result, Err(AuthError::InvalidToken(_)));
}

#[test]
fn debug_output_hides_the_token() {
    let session = Session::new("7", Role::Admin, "abcdefghijklmnopqrstuvwxyz");
    let printed = format!("{session:?}");
    assert!(!printed.contains("abcdefghijklmnopqrstuvwxyz"));
    assert!(printed.contains("abcdef...wxyz"));
}

#[test]
fn only_staff_manage_surveys() {
    assert!(Role::Admin.manages_surveys());
    assert!(Role::Teacher.manages_surveys());
    assert!(!Role::Student.manages_surveys());
}
