use actix::Addr;
use actix_web::{HttpRequest, HttpResponse, web};
use actix_web_actors::ws;

use crate::comment::service::CommentService;
use crate::middleware::auth::validate_token;
use crate::realtime::server::FeedServer;
use crate::realtime::session::FeedSession;

#[derive(serde::Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

/// WebSocket comment-feed connection. Watching is read-only, so the token
/// is optional; clients that present one get their user id attached.
/// GET /ws/feed?token=<jwt_token>
pub async fn ws_feed(
    req: HttpRequest,
    stream: web::Payload,
    server: web::Data<Addr<FeedServer>>,
    comments: web::Data<CommentService>,
    query: web::Query<TokenQuery>,
) -> Result<HttpResponse, actix_web::Error> {
    let user_id = query
        .token
        .as_deref()
        .and_then(|token| validate_token(token).ok());

    log::info!("Feed connection request from user: {:?}", user_id);

    let session = FeedSession::new(
        user_id,
        server.get_ref().clone(),
        comments.clone().into_inner(),
    );

    ws::start(session, &req, stream)
}
