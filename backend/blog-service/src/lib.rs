/// Blog Service Library
///
/// REST backend for posts and comments with token authentication and
/// author-scoped write permissions.
///
/// # Modules
///
/// - `handlers`: HTTP request handlers for posts, comments and token issuance
/// - `routes`: the route table wiring paths and methods to handlers
/// - `models`: Domain records and their JSON representations
/// - `services`: Business logic layer (visibility, authorization, token issuance)
/// - `db`: Store traits plus PostgreSQL and in-memory backends
/// - `middleware`: Token authentication and the authorization policy
/// - `security`: Password hashing and token generation
/// - `error`: Error types and handling
/// - `config`: Configuration management
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod security;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;
