use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Admin {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Audit record for admin actions. Written inside the same transaction as
/// the action it describes.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AdminLog {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub admin_id: ObjectId,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<ObjectId>,
    pub detail: String,
    pub created_at: DateTime<Utc>,
}
