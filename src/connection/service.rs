use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Client, Collection};

use crate::connection::model::{Connection, ConnectionStatus};
use crate::database::{database_name, db::collections};
use crate::utils::error::CustomError;

pub struct ConnectionService {
    connections: Collection<Connection>,
}

impl ConnectionService {
    pub fn new(client: &Client) -> Self {
        let collection = client
            .database(&database_name())
            .collection::<Connection>(collections::CONNECTIONS);
        ConnectionService {
            connections: collection,
        }
    }

    /// Send a connection request. One connection per pair, either direction.
    pub async fn request(
        &self,
        requester_id: ObjectId,
        recipient_id: ObjectId,
    ) -> Result<Connection, CustomError> {
        if requester_id == recipient_id {
            return Err(CustomError::BadRequestError(
                "Cannot connect with yourself".to_string(),
            ));
        }

        let existing = self
            .connections
            .find_one(doc! {
                "$or": [
                    { "requester_id": requester_id, "recipient_id": recipient_id },
                    { "requester_id": recipient_id, "recipient_id": requester_id },
                ]
            })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to check connections: {}", e))
            })?;
        if existing.is_some() {
            return Err(CustomError::ConflictError(
                "Connection already exists".to_string(),
            ));
        }

        let connection = Connection {
            id: None,
            requester_id,
            recipient_id,
            status: ConnectionStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let result = self.connections.insert_one(&connection).await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to create connection: {}", e))
        })?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            CustomError::InternalServerError("Failed to get inserted connection ID".to_string())
        })?;

        Ok(Connection {
            id: Some(id),
            ..connection
        })
    }

    async fn fetch(&self, connection_id: &ObjectId) -> Result<Connection, CustomError> {
        self.connections
            .find_one(doc! { "_id": connection_id })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to fetch connection: {}", e))
            })?
            .ok_or_else(|| CustomError::NotFoundError("Connection not found".to_string()))
    }

    /// Accept or reject a pending request (recipient only)
    pub async fn respond(
        &self,
        connection_id: &ObjectId,
        requester: &ObjectId,
        accept: bool,
    ) -> Result<Connection, CustomError> {
        let connection = self.fetch(connection_id).await?;
        connection.ensure_can_respond(requester)?;

        let status = if accept {
            ConnectionStatus::Accepted
        } else {
            ConnectionStatus::Rejected
        };

        self.connections
            .update_one(
                doc! { "_id": connection_id },
                doc! {
                    "$set": {
                        "status": status.as_str(),
                        "updated_at": Utc::now().to_rfc3339()
                    }
                },
            )
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to update connection: {}", e))
            })?;

        self.fetch(connection_id).await
    }

    /// Remove a connection (either party)
    pub async fn remove(
        &self,
        connection_id: &ObjectId,
        requester: &ObjectId,
    ) -> Result<(), CustomError> {
        let connection = self.fetch(connection_id).await?;
        if !connection.involves(requester) {
            return Err(CustomError::PermissionDeniedError(
                "You are not part of this connection".to_string(),
            ));
        }

        self.connections
            .delete_one(doc! { "_id": connection_id })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to delete connection: {}", e))
            })?;

        Ok(())
    }

    /// All connections a user is part of, optionally filtered by status
    pub async fn list_for_user(
        &self,
        user_id: &ObjectId,
        status: Option<ConnectionStatus>,
    ) -> Result<Vec<Connection>, CustomError> {
        let mut filter = doc! {
            "$or": [
                { "requester_id": user_id },
                { "recipient_id": user_id },
            ]
        };
        if let Some(status) = status {
            filter.insert("status", status.as_str());
        }

        let cursor = self
            .connections
            .find(filter)
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to fetch connections: {}", e))
            })?;

        cursor.try_collect().await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to collect connections: {}", e))
        })
    }
}
