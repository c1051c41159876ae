pub mod authz;
pub mod error;
pub mod helpers;
