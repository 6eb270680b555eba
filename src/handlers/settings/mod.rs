use mongodb::bson::doc;

use crate::{constants::*, database::AppDatabase, models::SiteSettings};

pub mod get;
pub mod update;

/// Read the stored site settings, the built-in defaults when none are stored
pub async fn load_settings(db: &AppDatabase) -> anyhow::Result<SiteSettings> {
    let filter = doc! {"key": SETTINGS_DOC_KEY};
    let settings = db
        .find_one::<SiteSettings>(DB_NAME, COLL_SETTINGS, Some(filter), None)
        .await?
        .unwrap_or_default();
    Ok(settings)
}
