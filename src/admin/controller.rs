use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

use crate::admin::service::AdminService;
use crate::middleware::auth::get_user_id_from_request;
use crate::utils::error::CustomError;
use crate::utils::helpers::parse_object_id;

/// Recent admin audit log, admin-only
/// GET /admin/logs
pub async fn get_admin_logs(
    req: HttpRequest,
    admin_service: web::Data<AdminService>,
) -> Result<HttpResponse, CustomError> {
    let user_id_str = get_user_id_from_request(&req)
        .ok_or_else(|| CustomError::UnauthorizedError("Not authenticated".to_string()))?;
    let user_id = parse_object_id(&user_id_str, "user ID")?;

    admin_service.require_admin(&user_id).await?;
    let logs = admin_service.recent_logs(100).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Admin logs retrieved successfully",
        "httpStatusCode": 200,
        "count": logs.len(),
        "data": logs
    })))
}
