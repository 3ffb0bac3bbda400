pub mod downloads;
pub mod error;
pub mod handlers;
pub mod operations;
pub mod routes;

pub use routes::create_router;
