//! Request-gate tests: bearer extraction, token verification failures, and
//! role enforcement on protected routes.
//!
//! Gate rejections surface as service-level errors (the gate is a wrap
//! middleware), so failure cases go through `call_and_capture_error`
//! rather than `call_service`.

mod support;

use std::time::{Duration, SystemTime};

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::header;
use actix_web::test;
use backend::{mint_access_token, Principal, Role};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::json;
use support::{init_app, seeded_state, test_security};

async fn login_token<S, B>(app: &S, email: &str) -> String
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({"email": email, "password": "p"}))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    body["token"].as_str().unwrap().to_string()
}

fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {token}"))
}

/// Drive a request that the gate is expected to reject and return the
/// rejection's status plus its rendered problem body.
async fn call_and_capture_error<S, B>(app: &S, req: Request) -> (u16, serde_json::Value)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let err = match app.call(req).await {
        Ok(_) => panic!("expected gate rejection"),
        Err(err) => err,
    };
    let status = err.as_response_error().status_code().as_u16();
    let resp = err.error_response();
    let bytes = actix_web::body::to_bytes(resp.into_body()).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap();
    (status, body)
}

#[actix_web::test]
async fn missing_header_is_unauthenticated() {
    let app = init_app(seeded_state(test_security())).await;

    let req = test::TestRequest::get().uri("/protected").to_request();
    let (status, _body) = call_and_capture_error(&app, req).await;

    assert_eq!(status, 401);
}

#[actix_web::test]
async fn non_bearer_scheme_is_unauthenticated() {
    let app = init_app(seeded_state(test_security())).await;

    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header((header::AUTHORIZATION, "Basic dXNlcjpwYXNz"))
        .to_request();
    let (status, _body) = call_and_capture_error(&app, req).await;

    assert_eq!(status, 401);
}

#[actix_web::test]
async fn valid_token_reaches_the_resource() {
    let app = init_app(seeded_state(test_security())).await;
    let token = login_token(&app, "a@b.com").await;

    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["sub"].as_str().unwrap(), "a@b.com");
    assert_eq!(body["role"].as_str().unwrap(), "user");
}

#[actix_web::test]
async fn expired_token_is_rejected_with_generic_body() {
    let security = test_security();
    let app = init_app(seeded_state(security.clone())).await;

    let principal = Principal {
        sub: "a@b.com".to_string(),
        role: Role::User,
    };
    let stale = mint_access_token(
        &principal,
        SystemTime::now() - Duration::from_secs(20 * 60),
        &security,
    )
    .unwrap();

    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header(bearer(&stale))
        .to_request();
    let (status, body) = call_and_capture_error(&app, req).await;

    assert_eq!(status, 401);
    // The rejection reason stays internal.
    assert_eq!(body["code"].as_str().unwrap(), "UNAUTHORIZED");
    assert_eq!(body["detail"].as_str().unwrap(), "Authentication required");
}

#[actix_web::test]
async fn token_signed_with_another_key_is_rejected() {
    let app = init_app(seeded_state(test_security())).await;

    let other_key = backend::SecurityConfig::new("a-completely-different-secret".as_bytes());
    let principal = Principal {
        sub: "a@b.com".to_string(),
        role: Role::Admin,
    };
    let forged = mint_access_token(&principal, SystemTime::now(), &other_key).unwrap();

    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header(bearer(&forged))
        .to_request();
    let (status, _body) = call_and_capture_error(&app, req).await;

    assert_eq!(status, 401);
}

#[actix_web::test]
async fn alg_none_token_is_rejected() {
    let security = test_security();
    let app = init_app(seeded_state(security.clone())).await;

    // Reuse a genuine payload under an unsigned "none" header.
    let principal = Principal {
        sub: "a@b.com".to_string(),
        role: Role::User,
    };
    let genuine = mint_access_token(&principal, SystemTime::now(), &security).unwrap();
    let payload = genuine.split('.').nth(1).unwrap();
    let header_part = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let forged = format!("{header_part}.{payload}.");

    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header(bearer(&forged))
        .to_request();
    let (status, body) = call_and_capture_error(&app, req).await;

    assert_eq!(status, 401);
    assert_eq!(body["detail"].as_str().unwrap(), "Authentication required");
}

#[actix_web::test]
async fn admin_route_forbids_plain_users() {
    let app = init_app(seeded_state(test_security())).await;
    let token = login_token(&app, "a@b.com").await;

    let req = test::TestRequest::get()
        .uri("/admin")
        .insert_header(bearer(&token))
        .to_request();
    let (status, body) = call_and_capture_error(&app, req).await;

    assert_eq!(status, 403);
    assert_eq!(body["code"].as_str().unwrap(), "FORBIDDEN");
}

#[actix_web::test]
async fn admin_route_admits_admins() {
    let app = init_app(seeded_state(test_security())).await;
    let token = login_token(&app, "root@b.com").await;

    let req = test::TestRequest::get()
        .uri("/admin")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["role"].as_str().unwrap(), "admin");
}

#[actix_web::test]
async fn admin_token_also_passes_user_gates() {
    let app = init_app(seeded_state(test_security())).await;
    let token = login_token(&app, "root@b.com").await;

    let req = test::TestRequest::get()
        .uri("/protected")
        .insert_header(bearer(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status().as_u16(), 200);
}
