use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::utils::error::CustomError;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Pending => "pending",
            ConnectionStatus::Accepted => "accepted",
            ConnectionStatus::Rejected => "rejected",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CustomError> {
        match raw {
            "pending" => Ok(ConnectionStatus::Pending),
            "accepted" => Ok(ConnectionStatus::Accepted),
            "rejected" => Ok(ConnectionStatus::Rejected),
            other => Err(CustomError::BadRequestError(format!(
                "Invalid connection status: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Connection {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub requester_id: ObjectId,
    pub recipient_id: ObjectId,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Connection {
    pub fn involves(&self, user_id: &ObjectId) -> bool {
        self.requester_id == *user_id || self.recipient_id == *user_id
    }

    /// Only the recipient of a pending request may accept or reject it.
    pub fn ensure_can_respond(&self, user_id: &ObjectId) -> Result<(), CustomError> {
        if self.recipient_id != *user_id {
            return Err(CustomError::PermissionDeniedError(
                "Only the recipient can respond to a connection request".to_string(),
            ));
        }
        if self.status != ConnectionStatus::Pending {
            return Err(CustomError::ConflictError(
                "Connection request already resolved".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
pub struct CreateConnectionRequest {
    pub recipient_id: String,
}

#[derive(Deserialize)]
pub struct ListConnectionsQuery {
    pub status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending(requester: ObjectId, recipient: ObjectId) -> Connection {
        Connection {
            id: Some(ObjectId::new()),
            requester_id: requester,
            recipient_id: recipient,
            status: ConnectionStatus::Pending,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn recipient_can_respond_to_pending() {
        let recipient = ObjectId::new();
        let conn = pending(ObjectId::new(), recipient);
        assert!(conn.ensure_can_respond(&recipient).is_ok());
    }

    #[test]
    fn requester_cannot_respond() {
        let requester = ObjectId::new();
        let conn = pending(requester, ObjectId::new());
        assert!(matches!(
            conn.ensure_can_respond(&requester),
            Err(CustomError::PermissionDeniedError(_))
        ));
    }

    #[test]
    fn resolved_request_cannot_be_responded_again() {
        let recipient = ObjectId::new();
        let mut conn = pending(ObjectId::new(), recipient);
        conn.status = ConnectionStatus::Accepted;
        assert!(matches!(
            conn.ensure_can_respond(&recipient),
            Err(CustomError::ConflictError(_))
        ));
    }

    #[test]
    fn involves_both_parties_only() {
        let requester = ObjectId::new();
        let recipient = ObjectId::new();
        let conn = pending(requester, recipient);
        assert!(conn.involves(&requester));
        assert!(conn.involves(&recipient));
        assert!(!conn.involves(&ObjectId::new()));
    }
}
