use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;

use super::controller::{
    create_event, declare_winners, get_event, list_events, list_submissions, submit_entry,
};
use crate::middleware::auth::verify_token;

pub fn event_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/events")
            .wrap(HttpAuthentication::bearer(verify_token))
            .route("", web::post().to(create_event))
            .route("", web::get().to(list_events))
            .route("/{event_id}", web::get().to(get_event))
            .route("/{event_id}/submissions", web::post().to(submit_entry))
            .route("/{event_id}/submissions", web::get().to(list_submissions))
            .route(
                "/{event_id}/declare-winners",
                web::post().to(declare_winners),
            ),
    );
}
