use axum::{extract::State, Json};
use std::sync::Arc;

use crate::{
    constants::*,
    mailer::otp_mail,
    models::*,
    state::AppState,
    utils::{normalize_email, AppError, ValidatedBody},
};

/// Request an email OTP
///
/// Generate a 6 digit code for the email and send it by mail.
/// A new request replaces any code issued earlier for the same email.
#[utoipa::path(
    post,
    path = "/api/email-otp/request",
    request_body = RequestOtpReq,
    responses(
        (status = StatusCode::OK, description = "OTP sent", body = RequestOtpResponse),
        (status = StatusCode::BAD_REQUEST, description = "Invalid email", body = ErrorResponse),
        (status = StatusCode::INTERNAL_SERVER_ERROR, description = "Mail could not be sent", body = ErrorResponse),
    ),
    tag = "Auth API"
)]
pub async fn request_otp_handler(
    State(state): State<Arc<AppState>>,
    ValidatedBody(body): ValidatedBody<RequestOtpReq>,
) -> Result<Json<RequestOtpResponse>, AppError> {
    let email = body
        .email
        .as_deref()
        .map(str::trim)
        .filter(|email| validator::validate_email(normalize_email(email)))
        .ok_or(AppError::BadRequestErr("Valid email is required".into()))?;
    let record = state.otp_store.issue(email);
    let mail = otp_mail(email, &record.code, OTP_VALIDITY_MINS);
    // the code stays stored even when the mail cannot be delivered
    if let Err(err) = state.mailer.send(&mail).await {
        tracing::error!("Failed to send otp mail to {email}: {:?}", err);
        return Err(AppError::ServerErr("Failed to send OTP email".into()));
    }
    tracing::debug!("otp issued for {email}");
    let res = RequestOtpResponse {
        success: true,
        data: MessageData {
            message: "OTP sent".to_owned(),
        },
    };
    Ok(Json(res))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
        routing::post,
        Router,
    };
    use tower::ServiceExt;

    use super::*;
    use crate::{mailer::MemoryMailer, state::test_support::test_state};

    fn request(body: &str) -> Request<Body> {
        Request::builder()
            .uri("/otp")
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_request_otp_stores_and_mails_code() {
        let mailer = Arc::new(MemoryMailer::default());
        let state = test_state(mailer.clone()).await;
        let app = Router::new()
            .route("/otp", post(request_otp_handler))
            .with_state(state.clone());
        let res = app
            .oneshot(request(r#"{"email":" Buyer@Example.com "}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        let body = hyper::body::to_bytes(res.into_body()).await.unwrap();
        let res: RequestOtpResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(res.success, true);
        assert_eq!(res.data.message, "OTP sent");

        let record = state.otp_store.get("buyer@example.com").unwrap();
        assert_eq!(record.code.len(), 6);
        let sent = mailer.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "Buyer@Example.com");
        assert!(sent[0].html.contains(&record.code));
    }

    #[tokio::test]
    async fn test_request_otp_rejects_invalid_email() {
        let state = test_state(Arc::new(MemoryMailer::default())).await;
        let app = Router::new()
            .route("/otp", post(request_otp_handler))
            .with_state(state);
        let bodies = [
            r#"{"email":"not-an-email"}"#,
            r#"{"email":"   "}"#,
            r#"{}"#,
            r#"{"email":42}"#,
        ];
        for body in bodies {
            let res = app.clone().oneshot(request(body)).await.unwrap();
            assert_eq!(res.status(), StatusCode::BAD_REQUEST);
            let body = hyper::body::to_bytes(res.into_body()).await.unwrap();
            let res: ErrorResponse = serde_json::from_slice(&body).unwrap();
            assert_eq!(res.success, false);
        }
    }

    #[tokio::test]
    async fn test_mail_failure_keeps_the_code() {
        let state = test_state(Arc::new(MemoryMailer::failing())).await;
        let app = Router::new()
            .route("/otp", post(request_otp_handler))
            .with_state(state.clone());
        let res = app
            .oneshot(request(r#"{"email":"buyer@example.com"}"#))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = hyper::body::to_bytes(res.into_body()).await.unwrap();
        let res: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(res.error, "Failed to send OTP email");
        assert!(state.otp_store.get("buyer@example.com").is_some());
    }
}
