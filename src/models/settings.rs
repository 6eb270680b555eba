use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::constants::*;

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneralSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100))]
    pub site_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(url)]
    pub site_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub contact_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, Validate, ToSchema)]
pub struct ContactSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(email)]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Public site settings, a single document of the `settings` collection
#[derive(Debug, Default, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    #[serde(default)]
    pub general: GeneralSettings,
    #[serde(default)]
    pub contact: ContactSettings,
    /// RFC 3339 timestamp of the last change
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Contact details after falling back from `contact` to `general` to the built-in defaults
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedContact {
    pub site_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
}

fn non_empty(val: &Option<String>) -> Option<&str> {
    val.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl SiteSettings {
    pub fn resolve_contact(&self) -> ResolvedContact {
        let site_name = non_empty(&self.general.site_name).unwrap_or(SITE_NAME);
        let email = non_empty(&self.contact.email)
            .or(non_empty(&self.general.contact_email))
            .unwrap_or(SITE_CONTACT_EMAIL);
        let phone = non_empty(&self.contact.phone)
            .or(non_empty(&self.general.contact_phone))
            .unwrap_or(SITE_CONTACT_PHONE);
        let address = non_empty(&self.contact.address)
            .or(non_empty(&self.general.address))
            .unwrap_or(SITE_ADDRESS);
        let mut parts = address.split(',').map(str::trim).filter(|p| !p.is_empty());
        let city = parts.next().unwrap_or("Rohtak").to_owned();
        let state = parts.next().unwrap_or("Haryana").to_owned();
        ResolvedContact {
            site_name: site_name.to_owned(),
            email: email.to_owned(),
            phone: phone.to_owned(),
            address: address.to_owned(),
            city,
            state,
        }
    }
}
