//! polyglot-service: the Rust member of the polyglot service templates.
//!
//! A single `/health` endpoint answering `{"status":"ok","service":"rust"}`
//! on port 3002, with the logging, configuration, and shutdown plumbing a
//! deployable service needs.

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::AppConfig;
pub use error::StartupError;
pub use routes::create_router;
pub use state::AppState;
