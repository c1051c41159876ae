use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;

use super::controller::{create_content, delete_content, get_content, list_content};
use crate::middleware::auth::verify_token;

pub fn content_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/content")
            .wrap(HttpAuthentication::bearer(verify_token))
            .route("/{content_type}", web::post().to(create_content))
            .route("/{content_type}", web::get().to(list_content))
            .route("/{content_type}/{content_id}", web::get().to(get_content))
            .route(
                "/{content_type}/{content_id}",
                web::delete().to(delete_content),
            ),
    );
}
