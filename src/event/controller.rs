use actix_web::{HttpRequest, HttpResponse, web};
use mongodb::bson::oid::ObjectId;
use serde_json::json;

use crate::admin::service::AdminService;
use crate::event::model::{
    CreateEventRequest, DeclareWinnersRequest, SubmitEntryRequest, WinnerPick,
};
use crate::event::service::EventService;
use crate::middleware::auth::get_user_id_from_request;
use crate::utils::error::CustomError;
use crate::utils::helpers::parse_object_id;

fn requester_id(req: &HttpRequest) -> Result<ObjectId, CustomError> {
    let user_id_str = get_user_id_from_request(req)
        .ok_or_else(|| CustomError::UnauthorizedError("Not authenticated".to_string()))?;
    parse_object_id(&user_id_str, "user ID")
}

/// Create an event (admin only)
/// POST /events
pub async fn create_event(
    req: HttpRequest,
    event_service: web::Data<EventService>,
    admin_service: web::Data<AdminService>,
    body: web::Json<CreateEventRequest>,
) -> Result<HttpResponse, CustomError> {
    let user_id = requester_id(&req)?;
    admin_service.require_admin(&user_id).await?;

    if body.title.trim().is_empty() {
        return Err(CustomError::BadRequestError(
            "Event title cannot be empty".to_string(),
        ));
    }

    let event = event_service
        .create_event(
            body.title.clone(),
            body.description.clone(),
            body.date.clone(),
            body.start_time.clone(),
            body.duration_hours,
            user_id,
        )
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Event created successfully",
        "httpStatusCode": 201,
        "data": event
    })))
}

/// List events, newest first, with derived statuses
/// GET /events
pub async fn list_events(
    event_service: web::Data<EventService>,
) -> Result<HttpResponse, CustomError> {
    let events = event_service.list_events().await?;
    let count = events.len();

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Events retrieved successfully",
        "httpStatusCode": 200,
        "count": count,
        "data": events
    })))
}

/// Get a single event with its derived status and any leaderboard
/// GET /events/{event_id}
pub async fn get_event(
    event_service: web::Data<EventService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let event_id = parse_object_id(&path.into_inner(), "event ID")?;
    let event = event_service.get_event(&event_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Event retrieved successfully",
        "httpStatusCode": 200,
        "data": event
    })))
}

/// Submit a video entry to an event
/// POST /events/{event_id}/submissions
pub async fn submit_entry(
    req: HttpRequest,
    event_service: web::Data<EventService>,
    path: web::Path<String>,
    body: web::Json<SubmitEntryRequest>,
) -> Result<HttpResponse, CustomError> {
    let user_id = requester_id(&req)?;
    let event_id = parse_object_id(&path.into_inner(), "event ID")?;

    if body.video_url.trim().is_empty() {
        return Err(CustomError::BadRequestError(
            "Video URL cannot be empty".to_string(),
        ));
    }

    let submission = event_service
        .submit_entry(
            &event_id,
            user_id,
            body.user_name.clone(),
            body.video_url.clone(),
        )
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Submission created successfully",
        "httpStatusCode": 201,
        "data": submission
    })))
}

/// List an event's submissions
/// GET /events/{event_id}/submissions
pub async fn list_submissions(
    event_service: web::Data<EventService>,
    path: web::Path<String>,
) -> Result<HttpResponse, CustomError> {
    let event_id = parse_object_id(&path.into_inner(), "event ID")?;
    let submissions = event_service.list_submissions(&event_id).await?;
    let count = submissions.len();

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Submissions retrieved successfully",
        "httpStatusCode": 200,
        "count": count,
        "data": submissions
    })))
}

/// Declare an event's winners (admin only, atomic)
/// POST /events/{event_id}/declare-winners
pub async fn declare_winners(
    req: HttpRequest,
    event_service: web::Data<EventService>,
    admin_service: web::Data<AdminService>,
    path: web::Path<String>,
    body: web::Json<DeclareWinnersRequest>,
) -> Result<HttpResponse, CustomError> {
    let user_id = requester_id(&req)?;
    let admin = admin_service.require_admin(&user_id).await?;
    let event_id = parse_object_id(&path.into_inner(), "event ID")?;

    let mut picks = Vec::with_capacity(body.winners.len());
    for pick in &body.winners {
        picks.push(WinnerPick {
            submission_id: parse_object_id(&pick.submission_id, "submission ID")?,
            rank: pick.rank,
        });
    }

    let event = event_service
        .declare_winners(&event_id, &admin, picks)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Winners declared successfully",
        "httpStatusCode": 200,
        "data": event
    })))
}
