pub mod db;

pub use db::{connect_to_mongo, database_name};
