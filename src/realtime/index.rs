use actix_web::web;

use super::controller::ws_feed;

pub fn realtime_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/ws/feed", web::get().to(ws_feed));
}
