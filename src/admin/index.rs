use actix_web::web;
use actix_web_httpauth::middleware::HttpAuthentication;

use super::controller::get_admin_logs;
use crate::middleware::auth::verify_token;

pub fn admin_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/admin")
            .wrap(HttpAuthentication::bearer(verify_token))
            .route("/logs", web::get().to(get_admin_logs)),
    );
}
