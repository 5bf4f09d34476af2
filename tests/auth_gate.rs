use axum::extract::FromRequestParts;
use axum::http::Request;
use chrono::Utc;
use storefront_api::{
    config::AppConfig,
    dto::auth::Claims,
    entity::users,
    middleware::auth::{AuthToken, MaybeAuthToken},
    services::token_service,
    state::AppState,
};
use uuid::Uuid;

fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        access_token_secret: "accesssecret".to_string(),
        refresh_token_secret: "refreshsecret".to_string(),
        access_token_ttl_secs: 3600,
        refresh_token_ttl_secs: 86400,
    }
}

// The gate never touches the database, so lazy connections are enough.
fn test_state() -> AppState {
    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://localhost:5432/unused")
        .expect("lazy pool");
    let orm = sea_orm::SqlxPostgresConnector::from_sqlx_postgres_pool(pool.clone());
    AppState {
        pool,
        orm,
        config: test_config(),
    }
}

fn sample_user() -> users::Model {
    users::Model {
        id: Uuid::new_v4(),
        username: "ferris@example.com".to_string(),
        name: "Ferris".to_string(),
        password_hash: Some("unused".to_string()),
        is_admin: false,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

async fn extract(header: Option<&str>) -> Result<Claims, String> {
    let state = test_state();
    let mut builder = Request::builder();
    if let Some(value) = header {
        builder = builder.header("authorization", value);
    }
    let (mut parts, _) = builder.body(()).expect("request").into_parts();

    AuthToken::from_request_parts(&mut parts, &state)
        .await
        .map(|AuthToken(claims)| claims)
        .map_err(|e| e.to_string())
}

#[tokio::test]
async fn missing_header_is_rejected() {
    let err = extract(None).await.unwrap_err();
    assert_eq!(err, "Access token missing from request");
}

#[tokio::test]
async fn non_bearer_scheme_is_rejected_as_missing() {
    let err = extract(Some("Basic dXNlcjpwYXNz")).await.unwrap_err();
    assert_eq!(err, "Access token missing from request");
}

#[tokio::test]
async fn garbage_token_is_rejected_as_invalid() {
    let err = extract(Some("Bearer not.a.jwt")).await.unwrap_err();
    assert_eq!(err, "Invalid or expired access token");
}

#[tokio::test]
async fn valid_token_exposes_user_claims() {
    let config = test_config();
    let user = sample_user();
    let tokens = token_service::issue_session_tokens(&config, &user).expect("tokens");

    let claims = extract(Some(&format!("Bearer {}", tokens.access_token)))
        .await
        .expect("claims");
    let decoded = claims.as_user().expect("user claims");
    assert_eq!(decoded.id, user.id);
}

#[tokio::test]
async fn bearer_scheme_is_case_insensitive() {
    let config = test_config();
    let user = sample_user();
    let tokens = token_service::issue_session_tokens(&config, &user).expect("tokens");

    let claims = extract(Some(&format!("bearer {}", tokens.access_token)))
        .await
        .expect("claims");
    assert!(claims.as_user().is_some());
}

#[tokio::test]
async fn maybe_token_allows_absent_header_but_not_bad_tokens() {
    let state = test_state();

    let (mut parts, _) = Request::builder()
        .body(())
        .expect("request")
        .into_parts();
    let MaybeAuthToken(claims) = MaybeAuthToken::from_request_parts(&mut parts, &state)
        .await
        .expect("no header is fine");
    assert!(claims.is_none());

    let (mut parts, _) = Request::builder()
        .header("authorization", "Bearer not.a.jwt")
        .body(())
        .expect("request")
        .into_parts();
    let err = MaybeAuthToken::from_request_parts(&mut parts, &state)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Invalid or expired access token");
}
