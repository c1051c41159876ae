use actix_web::web;

use crate::admin::index::admin_routes;
use crate::comment::index::comment_routes;
use crate::connection::index::connection_routes;
use crate::content::index::content_routes;
use crate::event::index::event_routes;
use crate::realtime::index::realtime_routes;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(content_routes);
    cfg.configure(comment_routes);
    cfg.configure(event_routes);
    cfg.configure(connection_routes);
    cfg.configure(admin_routes);
    cfg.configure(realtime_routes);
}
