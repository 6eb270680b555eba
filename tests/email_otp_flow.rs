use axum::http::StatusCode;
use std::sync::Arc;
use tower::ServiceExt; // for `oneshot` and `ready`

use crate::helper::{
    body_json, build_post_request, get_app, get_app_with_config, test_config, test_mongodb_uri,
};
use listings_backend::{
    mailer::{Mail, MemoryMailer},
    models::{ErrorResponse, RequestOtpResponse, VerifyOtpResponse},
};

mod helper;

fn code_in(mail: &Mail) -> String {
    mail.text
        .chars()
        .filter(|ch| ch.is_ascii_digit())
        .collect()
}

#[tokio::test]
async fn test_new_code_invalidates_the_previous_one() {
    let mailer = Arc::new(MemoryMailer::default());
    let (app, state) = get_app(mailer.clone()).await;
    let body = r#"{"email":"buyer@example.com"}"#;
    for _ in 0..2 {
        let res = app
            .clone()
            .oneshot(build_post_request("/api/email-otp/request", body))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let res: RequestOtpResponse = body_json(res).await;
        assert_eq!(res.data.message, "OTP sent");
    }
    let sent = mailer.sent();
    assert_eq!(sent.len(), 2);
    let first = code_in(&sent[0]);
    let second = code_in(&sent[1]);
    assert_eq!(second.len(), 6);
    assert_eq!(state.otp_store.get("buyer@example.com").unwrap().code, second);

    if first != second {
        let verify = format!(r#"{{"email":"buyer@example.com","otp":"{first}"}}"#);
        let res = app
            .clone()
            .oneshot(build_post_request("/api/email-otp/verify", &verify))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let res: ErrorResponse = body_json(res).await;
        assert_eq!(res.error, "Invalid or expired OTP");
    }
    // the rejected attempt leaves the live code in place
    assert_eq!(state.otp_store.get("buyer@example.com").unwrap().code, second);
}

#[tokio::test]
async fn test_verify_validations() {
    let (app, _) = get_app(Arc::new(MemoryMailer::default())).await;
    let cases = [
        ("{}", "Email and OTP are required"),
        (r#"{"email":"buyer@example.com"}"#, "Email and OTP are required"),
        (r#"{"email":"new@example.com","otp":"123456"}"#, "Invalid or expired OTP"),
    ];
    for (body, error) in cases {
        let res = app
            .clone()
            .oneshot(build_post_request("/api/email-otp/verify", body))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let res: ErrorResponse = body_json(res).await;
        assert_eq!(res.success, false);
        assert_eq!(res.error, error);
    }
}

#[tokio::test]
async fn test_request_fails_when_mail_cannot_be_sent() {
    let (app, state) = get_app(Arc::new(MemoryMailer::failing())).await;
    let res = app
        .oneshot(build_post_request(
            "/api/email-otp/request",
            r#"{"email":"buyer@example.com"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let res: ErrorResponse = body_json(res).await;
    assert_eq!(res.error, "Failed to send OTP email");
    assert!(state.otp_store.get("buyer@example.com").is_some());
}

#[tokio::test]
async fn test_verified_login_creates_user_once_and_burns_the_code() {
    let Some(uri) = test_mongodb_uri() else {
        eprintln!("TEST_MONGODB_URI not set, skipping");
        return;
    };
    let mut config = test_config();
    config.mongodb_uri = uri;
    let mailer = Arc::new(MemoryMailer::default());
    let (app, state) = get_app_with_config(config, mailer.clone()).await;
    let email = format!("buyer.{}@example.com", mongodb::bson::oid::ObjectId::new().to_hex());
    let request = format!(r#"{{"email":"{}"}}"#, email.to_uppercase());

    let mut user_ids = vec![];
    for attempt in 0..2 {
        let res = app
            .clone()
            .oneshot(build_post_request("/api/email-otp/request", &request))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let code = code_in(&mailer.sent()[attempt]);
        let verify = format!(r#"{{"email":"{email}","otp":"{code}"}}"#);

        let res = app
            .clone()
            .oneshot(build_post_request("/api/email-otp/verify", &verify))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let res: VerifyOtpResponse = body_json(res).await;
        assert_eq!(res.success, true);
        assert_eq!(res.message, "OTP verified");
        assert_eq!(res.data.user.email, email);
        assert_eq!(res.data.user.user_type, "seller");
        assert_eq!(res.data.user.phone, "");
        let claims = state.jwt_keys.extract_claims(&res.data.token).unwrap();
        assert_eq!(claims.user_id, res.data.user.id);
        assert_eq!(claims.email, email);
        assert_eq!(claims.user_type, "seller");
        user_ids.push(res.data.user.id);

        // the same code cannot be used twice
        let res = app
            .clone()
            .oneshot(build_post_request("/api/email-otp/verify", &verify))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let res: ErrorResponse = body_json(res).await;
        assert_eq!(res.error, "Invalid or expired OTP");
    }
    // the second login finds the user created by the first
    assert_eq!(user_ids[0], user_ids[1]);
}
