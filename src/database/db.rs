use mongodb::bson::doc;
use mongodb::{Client, options::ClientOptions};
use std::error::Error;

/// Collection names shared by the services.
pub mod collections {
    pub const COMMENTS: &str = "comments";
    pub const POSTS: &str = "posts";
    pub const STORIES: &str = "stories";
    pub const MOMENTS: &str = "moments";
    pub const EVENTS: &str = "events";
    pub const EVENT_SUBMISSIONS: &str = "eventSubmissions";
    pub const CONNECTIONS: &str = "organizationConnections";
    pub const ADMINS: &str = "admins";
    pub const ADMIN_LOGS: &str = "adminLogs";
}

/// Database name, overridable via environment.
pub fn database_name() -> String {
    std::env::var("DATABASE_NAME").unwrap_or_else(|_| "engage_db".to_string())
}

pub struct Database {
    pub client: Client,
}

impl Database {
    pub async fn init() -> Result<Self, Box<dyn Error>> {
        let mongodb_uri = std::env::var("MONGODB_URI")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());

        let mut client_options = ClientOptions::parse(&mongodb_uri).await?;
        client_options.app_name = Some("engage_backend".to_string());

        let client = Client::with_options(client_options)?;

        // Ping the server to see if you can connect to the cluster
        client.database("admin").run_command(doc! {"ping": 1}).await?;

        log::info!("Connected successfully to MongoDB");

        Ok(Self { client })
    }
}

// This function is a convenience wrapper around Database::init()
pub async fn connect_to_mongo() -> Result<Client, Box<dyn Error>> {
    let database = Database::init().await.map_err(|e| {
        log::error!("Failed to initialize database: {:?}", e);
        e
    })?;
    Ok(database.client)
}
