use reqwest::Method;
use serde::Deserialize;

use super::ApiClient;
use crate::models::SiteSettings;

#[derive(Debug, Deserialize)]
struct SettingsEnvelope {
    data: SiteSettings,
}

impl ApiClient {
    /// Public site settings, `None` when they cannot be loaded. Callers fall
    /// back to the built-in contact details through
    /// [`SiteSettings::resolve_contact`].
    pub async fn fetch_settings(&self) -> Option<SiteSettings> {
        let res = self
            .request(Method::GET, "settings")
            .send()
            .await
            .map_err(|err| tracing::debug!("settings request failed: {:?}", err))
            .ok()?;
        if !res.status().is_success() {
            tracing::debug!("settings request answered with {}", res.status());
            return None;
        }
        let body = res.json::<SettingsEnvelope>().await.ok()?;
        Some(body.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::SITE_CONTACT_PHONE;

    #[tokio::test]
    async fn test_fetch_settings() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/settings")
            .with_header("content-type", "application/json")
            .with_body(r#"{"success":true,"data":{"general":{"siteName":"Homes"},"contact":{"email":"hi@homes.in"}}}"#)
            .create_async()
            .await;
        let client = ApiClient::new(&server.url());
        let settings = client.fetch_settings().await.unwrap();
        let resolved = settings.resolve_contact();
        assert_eq!(resolved.site_name, "Homes");
        assert_eq!(resolved.email, "hi@homes.in");
        assert_eq!(resolved.phone, SITE_CONTACT_PHONE);
    }

    #[tokio::test]
    async fn test_fetch_settings_failures() {
        let client = ApiClient::new("http://127.0.0.1:1");
        assert!(client.fetch_settings().await.is_none());

        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/settings")
            .with_body("<html>maintenance</html>")
            .create_async()
            .await;
        let client = ApiClient::new(&server.url());
        assert!(client.fetch_settings().await.is_none());
    }
}
