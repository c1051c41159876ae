pub mod controller;
pub mod debounce;
pub mod index;
pub mod model;
pub mod server;
pub mod session;
