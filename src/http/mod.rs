//! HTTP listener.
//!
//! Binds the configured address, announces it on stdout, and serves the
//! router until SIGTERM/SIGINT triggers a graceful drain.

mod server;
mod shutdown;

pub use server::{bind, resolve, serve, start_server, startup_line, ServerError};
