use serde::{Deserialize, Serialize};

use crate::comment::model::Comment;
use crate::content::model::ContentType;

/// Topic key for a content item's comment feed, e.g. `"post:65ab…"`.
pub fn topic_key(content_type: ContentType, content_id: &str) -> String {
    format!("{}:{}", content_type.as_str(), content_id)
}

/// What changed in a comment collection.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Created,
    Updated,
    Deleted,
    Liked,
}

/// WebSocket message from client
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Start watching comments on a content item
    Subscribe {
        content_type: String,
        content_id: String,
    },
    /// Stop watching
    Unsubscribe {
        content_type: String,
        content_id: String,
    },
    /// Ping to keep connection alive
    Ping,
}

/// WebSocket message to client
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established
    Connected { session_id: String },
    /// Now watching a topic
    Subscribed { topic: String },
    /// Stopped watching a topic
    Unsubscribed { topic: String },
    /// Fresh ordered snapshot of a topic's comments
    Snapshot {
        topic: String,
        comments: Vec<Comment>,
    },
    /// Error message
    Error { message: String },
    /// Pong response
    Pong,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_key_includes_kind_and_id() {
        assert_eq!(topic_key(ContentType::Story, "abc123"), "story:abc123");
        assert_ne!(
            topic_key(ContentType::Post, "abc123"),
            topic_key(ContentType::Moment, "abc123")
        );
    }
}
