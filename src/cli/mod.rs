//! CLI module
//!
//! Command-line interface and HTTP server.
//!
//! # Commands
//!
//! - `serve` - Start the HTTP server
//! - `list` - Print a page of posts
//! - `seed` - Create placeholder posts
//! - `token` - Issue an access token

mod commands;
mod runner;
mod server;

pub use commands::{Cli, Commands};
pub use runner::Runner;
pub use server::{router, serve, serve_on, AppState};
