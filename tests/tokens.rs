use chrono::Utc;
use jsonwebtoken::{DecodingKey, Validation, decode};
use storefront_api::{
    config::AppConfig,
    dto::auth::Claims,
    dto::checkout::{CartItems, CartLine},
    entity::users,
    middleware::auth::{decode_access_token, require_admin},
    services::token_service,
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

fn sample_user(is_admin: bool) -> users::Model {
    users::Model {
        id: Uuid::new_v4(),
        username: "ferris@example.com".to_string(),
        name: "Ferris".to_string(),
        password_hash: Some("unused".to_string()),
        is_admin,
        created_at: Utc::now().into(),
        updated_at: Utc::now().into(),
    }
}

#[test]
fn access_token_round_trips_user_claims() {
    let config = test_config();
    let user = sample_user(true);

    let tokens = token_service::issue_session_tokens(&config, &user).expect("tokens");
    let claims = decode_access_token(&config, &tokens.access_token).expect("decode");

    match claims {
        Claims::User(decoded) => {
            assert_eq!(decoded.id, user.id);
            assert_eq!(decoded.username, user.username);
            assert_eq!(decoded.name, user.name);
            assert!(decoded.is_admin);
        }
        Claims::Guest(_) => panic!("expected user claims"),
    }
}

#[test]
fn guest_token_round_trips_cart() {
    let config = test_config();
    let cart = CartItems {
        products: vec![
            CartLine {
                id: Uuid::new_v4(),
                quantity: 2,
            },
            CartLine {
                id: Uuid::new_v4(),
                quantity: 1,
            },
        ],
    };

    let token = token_service::issue_guest_token(&config, &cart).expect("guest token");
    let claims = decode_access_token(&config, &token).expect("decode");

    match claims {
        Claims::Guest(decoded) => assert_eq!(decoded.products, cart.products),
        Claims::User(_) => panic!("expected guest claims"),
    }
}

#[test]
fn token_signed_with_other_secret_is_rejected() {
    let config = test_config();
    let mut other = test_config();
    other.access_token_secret = "differentsecret".to_string();

    let user = sample_user(false);
    let tokens = token_service::issue_session_tokens(&other, &user).expect("tokens");

    let err = decode_access_token(&config, &tokens.access_token).unwrap_err();
    assert_eq!(err.to_string(), "Invalid or expired access token");
}

#[test]
fn refresh_record_expiry_is_epoch_millis_in_the_future() {
    let config = test_config();
    let user = sample_user(false);

    let before = Utc::now().timestamp_millis();
    let tokens = token_service::issue_session_tokens(&config, &user).expect("tokens");
    let after = Utc::now().timestamp_millis();

    let expiry: i64 = tokens
        .refresh_token
        .expiry_date
        .parse()
        .expect("numeric expiry");
    assert!(expiry >= before + config.refresh_token_ttl_secs * 1000);
    assert!(expiry <= after + config.refresh_token_ttl_secs * 1000);
    assert_eq!(tokens.refresh_token.user_id, user.id);
}

#[test]
fn refresh_token_carries_no_exp_claim() {
    let config = test_config();
    let user = sample_user(false);
    let tokens = token_service::issue_session_tokens(&config, &user).expect("tokens");

    let mut validation = Validation::default();
    validation.set_required_spec_claims::<&str>(&[]);
    validation.validate_exp = false;

    let data = decode::<serde_json::Value>(
        &tokens.refresh_token.token,
        &DecodingKey::from_secret(config.refresh_token_secret.as_bytes()),
        &validation,
    )
    .expect("refresh token decodes with refresh secret");

    assert!(data.claims.get("exp").is_none());
    assert_eq!(
        data.claims.get("isadmin"),
        Some(&serde_json::Value::Bool(false))
    );
}

#[test]
fn require_admin_accepts_admins_only() {
    let config = test_config();

    let admin = sample_user(true);
    let tokens = token_service::issue_session_tokens(&config, &admin).expect("tokens");
    let claims = decode_access_token(&config, &tokens.access_token).expect("decode");
    assert!(require_admin(&claims, "list orders").is_ok());

    let user = sample_user(false);
    let tokens = token_service::issue_session_tokens(&config, &user).expect("tokens");
    let claims = decode_access_token(&config, &tokens.access_token).expect("decode");
    let err = require_admin(&claims, "list orders").unwrap_err();
    assert_eq!(err.to_string(), "Only admin users can list orders");
}

#[test]
fn require_admin_rejects_guest_tokens() {
    let config = test_config();
    let cart = CartItems {
        products: vec![CartLine {
            id: Uuid::new_v4(),
            quantity: 1,
        }],
    };

    let token = token_service::issue_guest_token(&config, &cart).expect("guest token");
    let claims = decode_access_token(&config, &token).expect("decode");

    let err = require_admin(&claims, "delete orders").unwrap_err();
    assert_eq!(err.to_string(), "Only admin users can delete orders");
}
