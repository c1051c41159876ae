use actix_web::{HttpRequest, HttpResponse, web};
use mongodb::bson::oid::ObjectId;
use serde_json::json;

use crate::connection::model::{ConnectionStatus, CreateConnectionRequest, ListConnectionsQuery};
use crate::connection::service::ConnectionService;
use crate::middleware::auth::get_user_id_from_request;
use crate::utils::error::CustomError;
use crate::utils::helpers::parse_object_id;

fn requester_id(req: &HttpRequest) -> Result<ObjectId, CustomError> {
    let user_id_str = get_user_id_from_request(req)
        .ok_or_else(|| CustomError::UnauthorizedError("Not authenticated".to_string()))?;
    parse_object_id(&user_id_str, "user ID")
}

/// Send a connection request
/// POST /connections
pub async fn create_connection(
    req: HttpRequest,
    connection_service: web::Data<ConnectionService>,
    body: web::Json<CreateConnectionRequest>,
) -> Result<HttpResponse, CustomError> {
    let requester = requester_id(&req)?;
    let recipient = parse_object_id(&body.recipient_id, "recipient ID")?;

    let connection = connection_service.request(requester, recipient).await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Connection request sent",
        "httpStatusCode": 201,
        "data": connection
    })))
}

/// Accept a pending request
/// POST /connections/{connection_id}/accept
pub async fn accept_connection(
    req: HttpRequest,
    connection_service: web::Data<ConnectionService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    respond(req, connection_service, path, true).await
}

/// Reject a pending request
/// POST /connections/{connection_id}/reject
pub async fn reject_connection(
    req: HttpRequest,
    connection_service: web::Data<ConnectionService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    respond(req, connection_service, path, false).await
}

async fn respond(
    req: HttpRequest,
    connection_service: web::Data<ConnectionService>,
    path: web::Path<String>,
    accept: bool,
) -> Result<HttpResponse, CustomError> {
    let requester = requester_id(&req)?;
    let connection_id = parse_object_id(&path.into_inner(), "connection ID")?;

    let connection = connection_service
        .respond(&connection_id, &requester, accept)
        .await?;

    let message = if accept {
        "Connection accepted"
    } else {
        "Connection rejected"
    };

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": message,
        "httpStatusCode": 200,
        "data": connection
    })))
}

/// Remove a connection
/// DELETE /connections/{connection_id}
pub async fn delete_connection(
    req: HttpRequest,
    connection_service: web::Data<ConnectionService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let requester = requester_id(&req)?;
    let connection_id = parse_object_id(&path.into_inner(), "connection ID")?;

    connection_service.remove(&connection_id, &requester).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Connection removed",
        "httpStatusCode": 200
    })))
}

/// List the requester's connections
/// GET /connections?status=pending
pub async fn list_connections(
    req: HttpRequest,
    connection_service: web::Data<ConnectionService>,
    query: web::Query<ListConnectionsQuery>,
) -> Result<HttpResponse, CustomError> {
    let requester = requester_id(&req)?;
    let status = match query.status.as_deref() {
        Some(raw) => Some(ConnectionStatus::parse(raw)?),
        None => None,
    };

    let connections = connection_service.list_for_user(&requester, status).await?;
    let count = connections.len();

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Connections retrieved successfully",
        "httpStatusCode": 200,
        "count": count,
        "data": connections
    })))
}
