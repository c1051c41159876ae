use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;

use super::controller::{
    create_comment, delete_comment, get_comment, get_content_comments, toggle_like, update_comment,
};
use crate::middleware::auth::verify_token;

pub fn comment_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/comments")
            .wrap(HttpAuthentication::bearer(verify_token))
            .route("", web::post().to(create_comment))
            .route(
                "/content/{content_type}/{content_id}",
                web::get().to(get_content_comments),
            )
            .route("/{comment_id}", web::get().to(get_comment))
            .route("/{comment_id}", web::put().to(update_comment))
            .route("/{comment_id}", web::delete().to(delete_comment))
            .route("/{comment_id}/like", web::post().to(toggle_like)),
    );
}
