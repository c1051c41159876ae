use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::bson::{Document, doc, oid::ObjectId};
use mongodb::{Client, Collection};

use crate::comment::model::{Comment, CommentWrite, CounterUpdate, LikeToggle, toggled};
use crate::content::model::ContentType;
use crate::database::{database_name, db::collections};
use crate::utils::authz::{Owned, ensure_owner};
use crate::utils::error::CustomError;

impl Owned for Comment {
    fn owner_id(&self) -> &ObjectId {
        &self.author_id
    }
}

pub struct CommentService {
    comments: Collection<Comment>,
    posts: Collection<Document>,
    stories: Collection<Document>,
    moments: Collection<Document>,
}

impl CommentService {
    pub fn new(client: &Client) -> Self {
        let db = client.database(&database_name());
        CommentService {
            comments: db.collection::<Comment>(collections::COMMENTS),
            posts: db.collection(collections::POSTS),
            stories: db.collection(collections::STORIES),
            moments: db.collection(collections::MOMENTS),
        }
    }

    fn content_collection(&self, content_type: ContentType) -> &Collection<Document> {
        match content_type {
            ContentType::Post => &self.posts,
            ContentType::Story => &self.stories,
            ContentType::Moment => &self.moments,
        }
    }

    /// Best-effort bump of the parent content's denormalized comment count.
    /// Not atomic with the comment write; a failure here is logged and
    /// reported only through the returned `CounterUpdate`.
    async fn bump_comment_count(
        &self,
        content_id: &ObjectId,
        content_type: ContentType,
        delta: i64,
    ) -> CounterUpdate {
        let result = self
            .content_collection(content_type)
            .update_one(
                doc! { "_id": content_id },
                doc! { "$inc": { "comment_count": delta } },
            )
            .await;

        match result {
            Ok(r) if r.matched_count > 0 => CounterUpdate::Applied,
            Ok(_) => {
                log::warn!(
                    "comment_count update matched no {} document {}",
                    content_type.as_str(),
                    content_id.to_hex()
                );
                CounterUpdate::Failed
            }
            Err(e) => {
                log::warn!(
                    "Failed to update comment_count on {} {}: {}",
                    content_type.as_str(),
                    content_id.to_hex(),
                    e
                );
                CounterUpdate::Failed
            }
        }
    }

    /// Add a new comment to a post, story or moment
    pub async fn add_comment(
        &self,
        content_id: ObjectId,
        content_type: ContentType,
        author_id: ObjectId,
        author_name: String,
        avatar_url: Option<String>,
        text: String,
    ) -> Result<CommentWrite, CustomError> {
        let comment = Comment {
            id: None,
            content_id,
            content_type,
            author_id,
            author_name,
            avatar_url,
            text,
            created_at: Utc::now(),
            liked_by: Vec::new(),
            like_count: 0,
            edited: false,
            edited_at: None,
        };

        let result = self.comments.insert_one(&comment).await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to add comment: {}", e))
        })?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            CustomError::InternalServerError("Failed to get inserted comment ID".to_string())
        })?;

        let counter = self.bump_comment_count(&content_id, content_type, 1).await;

        Ok(CommentWrite {
            comment: Comment {
                id: Some(id),
                ..comment
            },
            counter,
        })
    }

    /// Get all comments for a content item, oldest first
    pub async fn list_for_content(
        &self,
        content_id: &ObjectId,
        content_type: ContentType,
    ) -> Result<Vec<Comment>, CustomError> {
        let cursor = self
            .comments
            .find(doc! { "content_id": content_id, "content_type": content_type.as_str() })
            .sort(doc! { "created_at": 1 })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to fetch comments: {}", e))
            })?;

        cursor.try_collect().await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to collect comments: {}", e))
        })
    }

    /// Get a single comment by ID
    pub async fn get_comment_by_id(
        &self,
        comment_id: &ObjectId,
    ) -> Result<Option<Comment>, CustomError> {
        self.comments
            .find_one(doc! { "_id": comment_id })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to fetch comment: {}", e))
            })
    }

    async fn fetch_owned(
        &self,
        comment_id: &ObjectId,
        requester: &ObjectId,
    ) -> Result<Comment, CustomError> {
        let comment = self
            .get_comment_by_id(comment_id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("Comment not found".to_string()))?;

        ensure_owner(&comment, requester)?;
        Ok(comment)
    }

    /// Edit a comment's text (only the author can edit)
    pub async fn edit_comment(
        &self,
        comment_id: &ObjectId,
        requester: &ObjectId,
        text: String,
    ) -> Result<Comment, CustomError> {
        self.fetch_owned(comment_id, requester).await?;

        self.comments
            .update_one(
                doc! { "_id": comment_id },
                doc! {
                    "$set": {
                        "text": text.as_str(),
                        "edited": true,
                        "edited_at": Utc::now().to_rfc3339()
                    }
                },
            )
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to update comment: {}", e))
            })?;

        self.get_comment_by_id(comment_id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("Comment not found".to_string()))
    }

    /// Delete a comment (only the author can delete)
    pub async fn delete_comment(
        &self,
        comment_id: &ObjectId,
        content_id: &ObjectId,
        content_type: ContentType,
        requester: &ObjectId,
    ) -> Result<CommentWrite, CustomError> {
        let comment = self.fetch_owned(comment_id, requester).await?;

        if comment.content_id != *content_id || comment.content_type != content_type {
            return Err(CustomError::BadRequestError(
                "Comment does not belong to this content".to_string(),
            ));
        }

        let result = self
            .comments
            .delete_one(doc! { "_id": comment_id })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to delete comment: {}", e))
            })?;

        if result.deleted_count == 0 {
            return Err(CustomError::NotFoundError("Comment not found".to_string()));
        }

        let counter = self.bump_comment_count(content_id, content_type, -1).await;

        Ok(CommentWrite { comment, counter })
    }

    /// Flip a user's like on a comment, keeping `like_count` equal to the
    /// size of the liked set. Concurrent flips from two clients are
    /// last-write-wins at the store; this mirrors the remote-store model.
    pub async fn toggle_like(
        &self,
        comment_id: &ObjectId,
        user_id: &ObjectId,
    ) -> Result<LikeToggle, CustomError> {
        let comment = self
            .get_comment_by_id(comment_id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("Comment not found".to_string()))?;

        let (liked_by, liked) = toggled(&comment.liked_by, user_id);
        let like_count = liked_by.len() as i64;

        self.comments
            .update_one(
                doc! { "_id": comment_id },
                doc! {
                    "$set": {
                        "liked_by": liked_by,
                        "like_count": like_count
                    }
                },
            )
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to toggle like: {}", e))
            })?;

        Ok(LikeToggle {
            liked,
            like_count,
            content_id: comment.content_id,
            content_type: comment.content_type,
        })
    }
}
