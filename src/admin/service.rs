use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Client, Collection};

use crate::admin::model::{Admin, AdminLog};
use crate::database::{database_name, db::collections};
use crate::utils::error::CustomError;

pub struct AdminService {
    admins: Collection<Admin>,
    logs: Collection<AdminLog>,
}

impl AdminService {
    pub fn new(client: &Client) -> Self {
        let db = client.database(&database_name());
        AdminService {
            admins: db.collection::<Admin>(collections::ADMINS),
            logs: db.collection::<AdminLog>(collections::ADMIN_LOGS),
        }
    }

    /// Gate for admin-only operations: PermissionDenied unless the user is
    /// in the admins collection.
    pub async fn require_admin(&self, user_id: &ObjectId) -> Result<Admin, CustomError> {
        self.admins
            .find_one(doc! { "user_id": user_id })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to look up admin: {}", e))
            })?
            .ok_or_else(|| {
                CustomError::PermissionDeniedError("Admin privileges required".to_string())
            })
    }

    /// Most recent audit entries, newest first
    pub async fn recent_logs(&self, limit: i64) -> Result<Vec<AdminLog>, CustomError> {
        let cursor = self
            .logs
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .limit(limit)
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to fetch admin logs: {}", e))
            })?;

        cursor.try_collect().await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to collect admin logs: {}", e))
        })
    }
}
