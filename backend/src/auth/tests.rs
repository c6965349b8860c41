use super::*;
use axum::http::Request;
use jsonwebtoken::{EncodingKey, Header, encode};

const SECRET: &str = "supersecretjwtsecretforunittesting123";
const USER_ID: &str = "123e4567-e89b-12d3-a456-426614174000";

fn claims(role: &str, exp: usize) -> AccessClaims {
    AccessClaims {
        sub: USER_ID.to_string(),
        role: role.to_string(),
        aud: role.to_string(),
        email: Some("test@example.com".to_string()),
        exp,
    }
}

fn token(claims: &AccessClaims, secret: &str) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

fn parts(authorization: Option<&str>) -> Parts {
    let mut builder = Request::builder().uri("/api/v1/entitlements/me");
    if let Some(value) = authorization {
        builder = builder.header(AUTHORIZATION, value);
    }
    let (mut parts, _) = builder.body(()).unwrap().into_parts();
    parts.extensions.insert(Arc::new(Auth {
        jwt_secret: SECRET.to_string(),
    }));
    parts
}

#[test]
fn test_validate_jwt_success() {
    let my_claims = claims("authenticated", 9999999999);
    let decoded = validate_jwt(&token(&my_claims, SECRET), SECRET).expect("Valid token should pass");
    assert_eq!(decoded.sub, my_claims.sub);
    assert_eq!(decoded.email, my_claims.email);
}

#[test]
fn test_validate_jwt_expired() {
    let result = validate_jwt(&token(&claims("authenticated", 1), SECRET), SECRET);
    assert!(result.is_err());
}

#[test]
fn test_validate_jwt_invalid_signature() {
    let result = validate_jwt(
        &token(&claims("authenticated", 9999999999), "wrongsecret"),
        SECRET,
    );
    assert!(result.is_err());
}

#[test]
fn test_validate_jwt_unknown_audience() {
    let mut my_claims = claims("authenticated", 9999999999);
    my_claims.aud = "anon".to_string();
    assert!(validate_jwt(&token(&my_claims, SECRET), SECRET).is_err());
}

#[tokio::test]
async fn auth_user_extracts_subject_and_role() {
    let bearer = format!("Bearer {}", token(&claims(SERVICE_ROLE, 9999999999), SECRET));
    let mut parts = parts(Some(&bearer));

    let user = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
    assert_eq!(user.user_id, Uuid::parse_str(USER_ID).unwrap());
    assert!(user.is_service());
}

#[tokio::test]
async fn auth_user_requires_header() {
    let mut parts = parts(None);
    assert!(matches!(
        AuthUser::from_request_parts(&mut parts, &()).await,
        Err(AuthError::Unauthorized(_))
    ));
}

#[tokio::test]
async fn optional_auth_user_allows_anonymous() {
    let mut parts = parts(None);
    let viewer = OptionalAuthUser::from_request_parts(&mut parts, &())
        .await
        .unwrap();
    assert!(viewer.0.is_none());
}

#[tokio::test]
async fn optional_auth_user_rejects_bad_token() {
    let mut parts = parts(Some("Bearer not-a-jwt"));
    assert!(
        OptionalAuthUser::from_request_parts(&mut parts, &())
            .await
            .is_err()
    );
}

#[tokio::test]
async fn missing_secret_is_a_server_error() {
    let bearer = format!("Bearer {}", token(&claims("authenticated", 9999999999), SECRET));
    let (mut parts, _) = Request::builder()
        .header(AUTHORIZATION, bearer)
        .body(())
        .unwrap()
        .into_parts();

    assert!(matches!(
        AuthUser::from_request_parts(&mut parts, &()).await,
        Err(AuthError::NotConfigured)
    ));
}
