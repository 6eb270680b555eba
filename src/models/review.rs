use mongodb::bson::{oid::ObjectId, Bson};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use utoipa::ToSchema;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn to_bson(&self) -> Bson {
        Bson::String(self.to_string())
    }
}

impl Display for ReviewStatus {
    fn fmt(&self, f: &mut Formatter) -> FmtResult {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Rejected => write!(f, "rejected"),
        }
    }
}

/// Review document of the `reviews` collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub target_id: String,
    pub target_type: String,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub comment: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub status: ReviewStatus,
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_note: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
}

/// Review as exposed by the API, with the id as a hex string
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewData {
    pub id: String,
    pub target_id: String,
    pub target_type: String,
    pub rating: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub comment: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub status: ReviewStatus,
    #[serde(default)]
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_note: Option<String>,
    pub created_at: u64,
    pub updated_at: u64,
}

impl From<Review> for ReviewData {
    fn from(review: Review) -> Self {
        Self {
            id: review.id.map(|id| id.to_hex()).unwrap_or_default(),
            target_id: review.target_id,
            target_type: review.target_type,
            rating: review.rating,
            title: review.title,
            comment: review.comment,
            images: review.images,
            status: review.status,
            user_id: review.user_id,
            admin_note: review.admin_note,
            created_at: review.created_at,
            updated_at: review.updated_at,
        }
    }
}
