use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::content::model::{ContentType, CreateContentRequest};
use crate::content::service::ContentService;
use crate::middleware::auth::get_user_id_from_request;
use crate::utils::error::CustomError;
use crate::utils::helpers::parse_object_id;

fn requester_id(req: &HttpRequest) -> Result<mongodb::bson::oid::ObjectId, CustomError> {
    let user_id_str = get_user_id_from_request(req)
        .ok_or_else(|| CustomError::UnauthorizedError("Not authenticated".to_string()))?;
    parse_object_id(&user_id_str, "user ID")
}

/// Create a post, story or moment
/// POST /content/{content_type}
pub async fn create_content(
    req: HttpRequest,
    content_service: web::Data<ContentService>,
    path: web::Path<String>,
    body: web::Json<CreateContentRequest>,
) -> Result<HttpResponse, CustomError> {
    let author_id = requester_id(&req)?;
    let content_type = ContentType::parse(&path.into_inner())?;

    if body.caption.trim().is_empty() {
        return Err(CustomError::BadRequestError(
            "Caption cannot be empty".to_string(),
        ));
    }

    let item = content_service
        .create(
            content_type,
            author_id,
            None,
            body.caption.clone(),
            body.media_url.clone(),
        )
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Content created successfully",
        "httpStatusCode": 201,
        "data": item
    })))
}

/// List content of one type, newest first
/// GET /content/{content_type}
pub async fn list_content(
    content_service: web::Data<ContentService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let content_type = ContentType::parse(&path.into_inner())?;
    let items = content_service.list(content_type).await?;
    let count = items.len();

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Content retrieved successfully",
        "httpStatusCode": 200,
        "count": count,
        "data": items
    })))
}

/// Get a single content item
/// GET /content/{content_type}/{content_id}
pub async fn get_content(
    content_service: web::Data<ContentService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, CustomError> {
    let (raw_type, raw_id) = path.into_inner();
    let content_type = ContentType::parse(&raw_type)?;
    let content_id = parse_object_id(&raw_id, "content ID")?;

    let item = content_service
        .get(content_type, &content_id)
        .await?
        .ok_or_else(|| CustomError::NotFoundError("Content not found".to_string()))?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Content retrieved successfully",
        "httpStatusCode": 200,
        "data": item
    })))
}

/// Delete a content item and its comments
/// DELETE /content/{content_type}/{content_id}
pub async fn delete_content(
    req: HttpRequest,
    content_service: web::Data<ContentService>,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, CustomError> {
    let requester = requester_id(&req)?;
    let (raw_type, raw_id) = path.into_inner();
    let content_type = ContentType::parse(&raw_type)?;
    let content_id = parse_object_id(&raw_id, "content ID")?;

    content_service
        .delete(content_type, &content_id, &requester)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Content deleted successfully",
        "httpStatusCode": 200
    })))
}
