use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::database::db::collections;
use crate::utils::error::CustomError;

/// Kind of content a comment can attach to. Each kind lives in its own
/// collection but shares one document shape.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Post,
    Story,
    Moment,
}

impl ContentType {
    pub fn collection_name(&self) -> &'static str {
        match self {
            ContentType::Post => collections::POSTS,
            ContentType::Story => collections::STORIES,
            ContentType::Moment => collections::MOMENTS,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Post => "post",
            ContentType::Story => "story",
            ContentType::Moment => "moment",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CustomError> {
        match raw {
            "post" => Ok(ContentType::Post),
            "story" => Ok(ContentType::Story),
            "moment" => Ok(ContentType::Moment),
            other => Err(CustomError::BadRequestError(format!(
                "Invalid content type: {}",
                other
            ))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ContentItem {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub author_id: ObjectId,
    pub author_name: Option<String>,
    pub caption: String,
    pub media_url: Option<String>,
    /// Denormalized comment count, maintained best-effort by the comment
    /// service. May drift from the true count under partial failure.
    pub comment_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateContentRequest {
    pub caption: String,
    pub media_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_type_parse_round_trip() {
        for raw in ["post", "story", "moment"] {
            assert_eq!(ContentType::parse(raw).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn content_type_parse_rejects_unknown() {
        assert!(matches!(
            ContentType::parse("reel"),
            Err(CustomError::BadRequestError(_))
        ));
    }

    #[test]
    fn content_type_maps_to_collections() {
        assert_eq!(ContentType::Post.collection_name(), "posts");
        assert_eq!(ContentType::Story.collection_name(), "stories");
        assert_eq!(ContentType::Moment.collection_name(), "moments");
    }
}
