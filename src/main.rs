use actix::Actor;
use actix_web::http::StatusCode;
use actix_web::middleware::{ErrorHandlers, Logger};
use actix_web::{App, HttpResponse, HttpServer, Responder, get, web};
use dotenv::dotenv;
use env_logger::Env;
use log::info;
use serde_json::json;

mod admin;
mod comment;
mod connection;
mod content;
mod database;
mod event;
mod middleware;
mod realtime;
mod router;
mod utils;

use admin::service::AdminService;
use comment::service::CommentService;
use connection::service::ConnectionService;
use content::service::ContentService;
use event::service::EventService;
use middleware::error_handler::handle_error;
use middleware::not_found::not_found;
use realtime::server::FeedServer;
use router::index::routes;

#[get("/")]
async fn default() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Welcome to the engage backend",
        "httpStatusCode": StatusCode::OK.as_u16(),
        "service": std::env::var("SERVICE_NAME").unwrap_or_else(|_| "Unknown".to_string()),
    }))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    // Initialize logger with environment variable support
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    info!("Starting server on http://localhost:{}", port);

    let mongo_client = database::connect_to_mongo()
        .await
        .expect("Failed to connect to MongoDB");

    // Feed actor fans comment changes out to WebSocket sessions
    let feed_server = web::Data::new(FeedServer::new().start());

    let content_service = web::Data::new(ContentService::new(&mongo_client));
    let comment_service = web::Data::new(CommentService::new(&mongo_client));
    let event_service = web::Data::new(EventService::new(&mongo_client));
    let connection_service = web::Data::new(ConnectionService::new(&mongo_client));
    let admin_service = web::Data::new(AdminService::new(&mongo_client));

    // Start the HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(feed_server.clone())
            .app_data(content_service.clone())
            .app_data(comment_service.clone())
            .app_data(event_service.clone())
            .app_data(connection_service.clone())
            .app_data(admin_service.clone())
            .configure(routes)
            .wrap(
                ErrorHandlers::new()
                    .handler(StatusCode::NOT_FOUND, not_found)
                    .default_handler(handle_error),
            )
            .service(default)
    })
    .bind(("0.0.0.0", port))?
    .run()
    .await?;

    info!("Server has stopped");

    Ok(())
}
