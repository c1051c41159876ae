use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::content::model::ContentType;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Comment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub content_id: ObjectId,
    pub content_type: ContentType,
    pub author_id: ObjectId,
    pub author_name: String,
    pub avatar_url: Option<String>,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Users who liked this comment. `like_count` mirrors its length.
    pub liked_by: Vec<ObjectId>,
    pub like_count: i64,
    pub edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
}

/// Outcome of the secondary, denormalized comment-count write on the parent
/// content document. This write is best-effort: a failure is logged and
/// recorded here, never surfaced as an error on the primary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterUpdate {
    Applied,
    Failed,
}

/// Result of a comment create or delete: the primary write plus the
/// best-effort counter side effect, kept distinct so callers can observe
/// the drift window instead of assuming atomicity.
#[derive(Debug)]
pub struct CommentWrite {
    pub comment: Comment,
    pub counter: CounterUpdate,
}

#[derive(Debug)]
pub struct LikeToggle {
    pub liked: bool,
    pub like_count: i64,
    pub content_id: ObjectId,
    pub content_type: ContentType,
}

/// Idempotent membership flip: returns the new liked set and whether the
/// user is a member after the flip.
pub fn toggled(liked_by: &[ObjectId], user_id: &ObjectId) -> (Vec<ObjectId>, bool) {
    if liked_by.contains(user_id) {
        (
            liked_by.iter().filter(|id| *id != user_id).copied().collect(),
            false,
        )
    } else {
        let mut next = liked_by.to_vec();
        next.push(*user_id);
        (next, true)
    }
}

#[derive(Deserialize)]
pub struct CreateCommentRequest {
    pub content_id: String,
    pub content_type: String,
    pub author_name: String,
    pub avatar_url: Option<String>,
    pub text: String,
}

#[derive(Deserialize)]
pub struct UpdateCommentRequest {
    pub text: String,
}

#[derive(Deserialize)]
pub struct DeleteCommentRequest {
    pub content_id: String,
    pub content_type: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_adds_then_removes() {
        let user = ObjectId::new();
        let (set, liked) = toggled(&[], &user);
        assert!(liked);
        assert_eq!(set, vec![user]);

        let (set, liked) = toggled(&set, &user);
        assert!(!liked);
        assert!(set.is_empty());
    }

    #[test]
    fn toggle_parity() {
        // Odd number of toggles by one user leaves them in the set,
        // even leaves them out.
        let user = ObjectId::new();
        let mut set: Vec<ObjectId> = Vec::new();
        for round in 1..=7 {
            let (next, liked) = toggled(&set, &user);
            set = next;
            assert_eq!(liked, round % 2 == 1);
            assert_eq!(set.contains(&user), round % 2 == 1);
        }
    }

    #[test]
    fn toggle_leaves_other_users_alone() {
        let alice = ObjectId::new();
        let bob = ObjectId::new();
        let (set, _) = toggled(&[alice], &bob);
        assert!(set.contains(&alice));
        assert!(set.contains(&bob));

        let (set, _) = toggled(&set, &bob);
        assert_eq!(set, vec![alice]);
    }
}
