//! Typed client for the public API.
//!
//! The wrappers never fail: any transport or server error is logged and
//! turned into a neutral value (an empty list, `false`, `None`) so callers
//! can render without handling errors.

use reqwest::{header::CONTENT_TYPE, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;

pub mod reviews;
pub mod settings;

pub use reviews::SubmitOutcome;

const CLIENT_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    /// Client for the server at `base_url`, e.g. `https://aashishproperty.com`
    pub fn new(base_url: &str) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(CLIENT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_owned(),
            token: None,
        }
    }

    /// Send the token as a bearer on every request
    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_owned());
        self
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self
            .http
            .request(method, self.url(path))
            .header(CONTENT_TYPE, "application/json");
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }
}

/// Accept either a bare JSON array or the `{ success, data: [..] }` envelope
fn list_from<T: DeserializeOwned>(body: Value) -> Vec<T> {
    let list = match body {
        Value::Array(_) => body,
        Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
        _ => Value::Null,
    };
    serde_json::from_value(list).unwrap_or_else(|err| {
        tracing::debug!("unexpected list payload: {:?}", err);
        vec![]
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_url_joins_api_prefix() {
        let client = ApiClient::new("http://localhost:3000/");
        assert_eq!(client.url("reviews"), "http://localhost:3000/api/reviews");
        assert_eq!(client.url("/settings"), "http://localhost:3000/api/settings");
    }

    #[test]
    fn test_list_from_accepts_both_shapes() {
        let bare: Vec<u32> = list_from(json!([1, 2]));
        assert_eq!(bare, vec![1, 2]);
        let wrapped: Vec<u32> = list_from(json!({"success": true, "data": [3]}));
        assert_eq!(wrapped, vec![3]);
        let broken: Vec<u32> = list_from(json!({"success": true, "data": {"x": 1}}));
        assert!(broken.is_empty());
        let missing: Vec<u32> = list_from(json!("nope"));
        assert!(missing.is_empty());
    }
}
