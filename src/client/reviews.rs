use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::{list_from, ApiClient};
use crate::{
    constants::*,
    models::{CreateReviewReq, ReviewData, ReviewStatus},
};

/// Result of a review submission. `status` is the review status on
/// success, the HTTP status code on a server error, or `"error"` when the
/// server could not be reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub ok: bool,
    pub status: String,
}

impl SubmitOutcome {
    fn failed(status: impl Into<String>) -> Self {
        Self {
            ok: false,
            status: status.into(),
        }
    }
}

impl ApiClient {
    /// Approved reviews of a target, newest first. Empty on any failure.
    pub async fn fetch_approved_reviews(
        &self,
        target_id: &str,
        target_type: Option<&str>,
        limit: Option<i64>,
    ) -> Vec<ReviewData> {
        let target_type = target_type.unwrap_or(REVIEW_DEFAULT_TARGET_TYPE);
        let limit = limit.unwrap_or(REVIEW_DEFAULT_LIMIT).to_string();
        let query = [
            ("targetId", target_id),
            ("targetType", target_type),
            ("status", "approved"),
            ("limit", limit.as_str()),
        ];
        let req = self.request(Method::GET, "reviews").query(&query);
        self.fetch_list(req).await
    }

    pub async fn submit_review(&self, review: &CreateReviewReq) -> SubmitOutcome {
        let res = match self.request(Method::POST, "reviews").json(review).send().await {
            Ok(res) => res,
            Err(err) => {
                tracing::debug!("review submission failed: {:?}", err);
                return SubmitOutcome::failed("error");
            }
        };
        let code = res.status();
        if !code.is_success() {
            return SubmitOutcome::failed(code.as_u16().to_string());
        }
        let body = res.json::<Value>().await.unwrap_or(Value::Null);
        let status = body
            .pointer("/data/status")
            .or_else(|| body.get("status"))
            .and_then(Value::as_str)
            .unwrap_or("pending");
        SubmitOutcome {
            ok: true,
            status: status.to_owned(),
        }
    }

    /// Reviews waiting for moderation. Needs an admin token.
    pub async fn admin_list_pending(&self, limit: Option<i64>) -> Vec<ReviewData> {
        let limit = limit.unwrap_or(REVIEW_ADMIN_DEFAULT_LIMIT).to_string();
        let query = [("status", "pending"), ("limit", limit.as_str())];
        let req = self.request(Method::GET, "admin/reviews").query(&query);
        self.fetch_list(req).await
    }

    /// Approve or reject a review, `true` when the server accepted the change
    pub async fn admin_moderate(
        &self,
        id: &str,
        status: ReviewStatus,
        admin_note: Option<&str>,
    ) -> bool {
        let body = json!({"status": status, "adminNote": admin_note});
        let path = format!("admin/reviews/{id}");
        match self.request(Method::PATCH, &path).json(&body).send().await {
            Ok(res) => res.status().is_success(),
            Err(err) => {
                tracing::debug!("moderation of review {id} failed: {:?}", err);
                false
            }
        }
    }

    async fn fetch_list(&self, req: reqwest::RequestBuilder) -> Vec<ReviewData> {
        let res = match req.send().await {
            Ok(res) if res.status().is_success() => res,
            Ok(res) => {
                tracing::debug!("review listing answered with {}", res.status());
                return vec![];
            }
            Err(err) => {
                tracing::debug!("review listing failed: {:?}", err);
                return vec![];
            }
        };
        match res.json::<Value>().await {
            Ok(body) => list_from(body),
            Err(_) => vec![],
        }
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    fn review_json(id: &str) -> Value {
        json!({
            "id": id,
            "targetId": "p1",
            "targetType": "property",
            "rating": 5,
            "comment": "Great",
            "status": "approved",
            "userId": "u1",
            "createdAt": 1,
            "updatedAt": 1
        })
    }

    fn sample_review() -> CreateReviewReq {
        CreateReviewReq {
            target_id: "p1".into(),
            target_type: "property".into(),
            rating: 4,
            title: None,
            comment: "Nice place".into(),
            images: None,
        }
    }

    #[tokio::test]
    async fn test_fetch_approved_reviews() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/reviews")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("targetId".into(), "p1".into()),
                Matcher::UrlEncoded("targetType".into(), "property".into()),
                Matcher::UrlEncoded("status".into(), "approved".into()),
                Matcher::UrlEncoded("limit".into(), "20".into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(json!({"success": true, "data": [review_json("r1"), review_json("r2")]}).to_string())
            .create_async()
            .await;
        let client = ApiClient::new(&server.url());
        let reviews = client.fetch_approved_reviews("p1", None, None).await;
        mock.assert_async().await;
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].id, "r1");
        assert_eq!(reviews[1].status, ReviewStatus::Approved);
    }

    #[tokio::test]
    async fn test_fetch_approved_reviews_is_empty_on_failure() {
        // nothing listens on port 1
        let client = ApiClient::new("http://127.0.0.1:1");
        assert!(client.fetch_approved_reviews("p1", None, None).await.is_empty());

        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/reviews")
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body(r#"{"success":false,"error":"Unexpected error"}"#)
            .create_async()
            .await;
        let client = ApiClient::new(&server.url());
        assert!(client.fetch_approved_reviews("p1", None, Some(5)).await.is_empty());
    }

    #[tokio::test]
    async fn test_submit_review_outcomes() {
        let mut server = mockito::Server::new_async().await;
        let created = server
            .mock("POST", "/api/reviews")
            .match_header("authorization", "Bearer tok")
            .with_status(201)
            .with_body(r#"{"success":true,"data":{"id":"r9","status":"pending"}}"#)
            .create_async()
            .await;
        let client = ApiClient::new(&server.url()).with_token("tok");
        let outcome = client.submit_review(&sample_review()).await;
        created.assert_async().await;
        assert_eq!(
            outcome,
            SubmitOutcome {
                ok: true,
                status: "pending".into()
            }
        );

        let mut server = mockito::Server::new_async().await;
        let _unauthorized = server
            .mock("POST", "/api/reviews")
            .with_status(401)
            .create_async()
            .await;
        let client = ApiClient::new(&server.url());
        let outcome = client.submit_review(&sample_review()).await;
        assert_eq!(outcome, SubmitOutcome::failed("401"));

        let client = ApiClient::new("http://127.0.0.1:1");
        let outcome = client.submit_review(&sample_review()).await;
        assert_eq!(outcome, SubmitOutcome::failed("error"));
    }

    #[tokio::test]
    async fn test_admin_calls() {
        let mut server = mockito::Server::new_async().await;
        let _list = server
            .mock("GET", "/api/admin/reviews")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("status".into(), "pending".into()),
                Matcher::UrlEncoded("limit".into(), "50".into()),
            ]))
            .with_body(json!([review_json("r3")]).to_string())
            .create_async()
            .await;
        let _approve = server
            .mock("PATCH", "/api/admin/reviews/r3")
            .match_body(Matcher::PartialJsonString(r#"{"status":"approved"}"#.into()))
            .with_body(r#"{"success":true,"message":"Review approved"}"#)
            .create_async()
            .await;
        let _missing = server
            .mock("PATCH", "/api/admin/reviews/r4")
            .with_status(404)
            .create_async()
            .await;
        let client = ApiClient::new(&server.url()).with_token("admin");
        let pending = client.admin_list_pending(None).await;
        assert_eq!(pending.len(), 1);
        assert!(client.admin_moderate("r3", ReviewStatus::Approved, None).await);
        assert!(!client.admin_moderate("r4", ReviewStatus::Rejected, Some("spam")).await);
    }
}
