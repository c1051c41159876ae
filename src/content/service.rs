use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId};
use mongodb::{Client, Collection};

use crate::content::model::{ContentItem, ContentType};
use crate::database::{database_name, db::collections};
use crate::utils::error::CustomError;

pub struct ContentService {
    posts: Collection<ContentItem>,
    stories: Collection<ContentItem>,
    moments: Collection<ContentItem>,
    comments: Collection<mongodb::bson::Document>,
}

impl ContentService {
    pub fn new(client: &Client) -> Self {
        let db = client.database(&database_name());
        ContentService {
            posts: db.collection::<ContentItem>(collections::POSTS),
            stories: db.collection::<ContentItem>(collections::STORIES),
            moments: db.collection::<ContentItem>(collections::MOMENTS),
            comments: db.collection(collections::COMMENTS),
        }
    }

    fn collection(&self, content_type: ContentType) -> &Collection<ContentItem> {
        match content_type {
            ContentType::Post => &self.posts,
            ContentType::Story => &self.stories,
            ContentType::Moment => &self.moments,
        }
    }

    pub async fn create(
        &self,
        content_type: ContentType,
        author_id: ObjectId,
        author_name: Option<String>,
        caption: String,
        media_url: Option<String>,
    ) -> Result<ContentItem, CustomError> {
        let item = ContentItem {
            id: None,
            author_id,
            author_name,
            caption,
            media_url,
            comment_count: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let result = self
            .collection(content_type)
            .insert_one(&item)
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to create content: {}", e))
            })?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            CustomError::InternalServerError("Failed to get inserted content ID".to_string())
        })?;

        Ok(ContentItem {
            id: Some(id),
            ..item
        })
    }

    pub async fn get(
        &self,
        content_type: ContentType,
        id: &ObjectId,
    ) -> Result<Option<ContentItem>, CustomError> {
        self.collection(content_type)
            .find_one(doc! { "_id": id })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to fetch content: {}", e))
            })
    }

    pub async fn list(&self, content_type: ContentType) -> Result<Vec<ContentItem>, CustomError> {
        let cursor = self
            .collection(content_type)
            .find(doc! {})
            .sort(doc! { "created_at": -1 })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to fetch content: {}", e))
            })?;

        cursor.try_collect().await.map_err(|e| {
            CustomError::InternalServerError(format!("Failed to collect content: {}", e))
        })
    }

    /// Delete a content item (only the author can delete) along with the
    /// comments that reference it.
    pub async fn delete(
        &self,
        content_type: ContentType,
        id: &ObjectId,
        requester: &ObjectId,
    ) -> Result<(), CustomError> {
        let item = self
            .get(content_type, id)
            .await?
            .ok_or_else(|| CustomError::NotFoundError("Content not found".to_string()))?;

        crate::utils::authz::ensure_owner(&item, requester)?;

        self.collection(content_type)
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to delete content: {}", e))
            })?;

        self.comments
            .delete_many(doc! { "content_id": id, "content_type": content_type.as_str() })
            .await
            .map_err(|e| {
                CustomError::InternalServerError(format!("Failed to delete comments: {}", e))
            })?;

        Ok(())
    }
}

impl crate::utils::authz::Owned for ContentItem {
    fn owner_id(&self) -> &ObjectId {
        &self.author_id
    }
}
