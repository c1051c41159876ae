use actix::Addr;
use actix_web::{HttpRequest, HttpResponse, web};
use mongodb::bson::oid::ObjectId;
use serde_json::json;

use crate::comment::model::{CreateCommentRequest, DeleteCommentRequest, UpdateCommentRequest};
use crate::comment::service::CommentService;
use crate::content::model::ContentType;
use crate::middleware::auth::get_user_id_from_request;
use crate::realtime::model::{ChangeKind, topic_key};
use crate::realtime::server::{FeedServer, PublishChange};
use crate::utils::error::CustomError;
use crate::utils::helpers::parse_object_id;

fn requester_id(req: &HttpRequest) -> Result<ObjectId, CustomError> {
    let user_id_str = get_user_id_from_request(req)
        .ok_or_else(|| CustomError::UnauthorizedError("Not authenticated".to_string()))?;
    parse_object_id(&user_id_str, "user ID")
}

fn publish(
    feed: &web::Data<Addr<FeedServer>>,
    content_type: ContentType,
    content_id: &ObjectId,
    change: ChangeKind,
    comment_id: Option<&ObjectId>,
) {
    feed.do_send(PublishChange {
        topic: topic_key(content_type, &content_id.to_hex()),
        change,
        comment_id: comment_id.map(|id| id.to_hex()),
    });
}

/// Create a new comment on a post, story or moment
/// POST /comments
pub async fn create_comment(
    req: HttpRequest,
    comment_service: web::Data<CommentService>,
    feed: web::Data<Addr<FeedServer>>,
    body: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, CustomError> {
    let author_id = requester_id(&req)?;
    let content_type = ContentType::parse(&body.content_type)?;
    let content_id = parse_object_id(&body.content_id, "content ID")?;

    if body.text.trim().is_empty() {
        return Err(CustomError::BadRequestError(
            "Comment text cannot be empty".to_string(),
        ));
    }

    let write = comment_service
        .add_comment(
            content_id,
            content_type,
            author_id,
            body.author_name.clone(),
            body.avatar_url.clone(),
            body.text.clone(),
        )
        .await?;

    log::debug!("Comment counter update after create: {:?}", write.counter);

    publish(
        &feed,
        content_type,
        &content_id,
        ChangeKind::Created,
        write.comment.id.as_ref(),
    );

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Comment created successfully",
        "httpStatusCode": 201,
        "data": write.comment
    })))
}

/// Get all comments for a content item, oldest first
/// GET /comments/content/{content_type}/{content_id}
pub async fn get_content_comments(
    comment_service: web::Data<CommentService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, CustomError> {
    let (raw_type, raw_id) = path.into_inner();
    let content_type = ContentType::parse(&raw_type)?;
    let content_id = parse_object_id(&raw_id, "content ID")?;

    let comments = comment_service
        .list_for_content(&content_id, content_type)
        .await?;
    let count = comments.len();

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Comments retrieved successfully",
        "httpStatusCode": 200,
        "count": count,
        "data": comments
    })))
}

/// Get a single comment by ID
/// GET /comments/{comment_id}
pub async fn get_comment(
    comment_service: web::Data<CommentService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let comment_id = parse_object_id(&path.into_inner(), "comment ID")?;

    let comment = comment_service
        .get_comment_by_id(&comment_id)
        .await?
        .ok_or_else(|| CustomError::NotFoundError("Comment not found".to_string()))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Comment retrieved successfully",
        "httpStatusCode": 200,
        "data": comment
    })))
}

/// Edit a comment's text
/// PUT /comments/{comment_id}
pub async fn update_comment(
    req: HttpRequest,
    comment_service: web::Data<CommentService>,
    feed: web::Data<Addr<FeedServer>>,
    path: web::Path<String>,
    body: web::Json<UpdateCommentRequest>,
) -> Result<HttpResponse, CustomError> {
    let requester = requester_id(&req)?;
    let comment_id = parse_object_id(&path.into_inner(), "comment ID")?;

    if body.text.trim().is_empty() {
        return Err(CustomError::BadRequestError(
            "Comment text cannot be empty".to_string(),
        ));
    }

    let comment = comment_service
        .edit_comment(&comment_id, &requester, body.text.clone())
        .await?;

    publish(
        &feed,
        comment.content_type,
        &comment.content_id,
        ChangeKind::Updated,
        Some(&comment_id),
    );

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Comment updated successfully",
        "httpStatusCode": 200,
        "data": comment
    })))
}

/// Delete a comment
/// DELETE /comments/{comment_id}
pub async fn delete_comment(
    req: HttpRequest,
    comment_service: web::Data<CommentService>,
    feed: web::Data<Addr<FeedServer>>,
    path: web::Path<String>,
    body: web::Json<DeleteCommentRequest>,
) -> Result<HttpResponse, CustomError> {
    let requester = requester_id(&req)?;
    let comment_id = parse_object_id(&path.into_inner(), "comment ID")?;
    let content_type = ContentType::parse(&body.content_type)?;
    let content_id = parse_object_id(&body.content_id, "content ID")?;

    let write = comment_service
        .delete_comment(&comment_id, &content_id, content_type, &requester)
        .await?;
    log::debug!("Comment counter update after delete: {:?}", write.counter);

    publish(
        &feed,
        content_type,
        &content_id,
        ChangeKind::Deleted,
        Some(&comment_id),
    );

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Comment deleted successfully",
        "httpStatusCode": 200
    })))
}

/// Flip the requester's like on a comment
/// POST /comments/{comment_id}/like
pub async fn toggle_like(
    req: HttpRequest,
    comment_service: web::Data<CommentService>,
    feed: web::Data<Addr<FeedServer>>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let requester = requester_id(&req)?;
    let comment_id = parse_object_id(&path.into_inner(), "comment ID")?;

    let toggle = comment_service.toggle_like(&comment_id, &requester).await?;

    publish(
        &feed,
        toggle.content_type,
        &toggle.content_id,
        ChangeKind::Liked,
        Some(&comment_id),
    );

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Comment like toggled successfully",
        "httpStatusCode": 200,
        "liked": toggle.liked,
        "like_count": toggle.like_count
    })))
}
