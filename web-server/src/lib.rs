//! # Web Server
//!
//! HTTP surface of the joke feed: paged jokes with like counts and the like
//! endpoint, plus the static page that consumes them.

pub mod error;
pub mod handlers;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use server::{router, Server};
pub use state::AppContext;

/// Canonical path of the tool's main page.
pub const TOOL_PATH: &str = "/tools/hr-approved-ways-to-tell-off-dumb-people-at-work";
