use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;

use super::controller::{
    accept_connection, create_connection, delete_connection, list_connections, reject_connection,
};
use crate::middleware::auth::verify_token;

pub fn connection_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/connections")
            .wrap(HttpAuthentication::bearer(verify_token))
            .route("", web::post().to(create_connection))
            .route("", web::get().to(list_connections))
            .route("/{connection_id}/accept", web::post().to(accept_connection))
            .route("/{connection_id}/reject", web::post().to(reject_connection))
            .route("/{connection_id}", web::delete().to(delete_connection)),
    );
}
