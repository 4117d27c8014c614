//! HTTP JSON API over the calculator engines
//!
//! Run with `calcdeck-server`.

pub mod handlers;
pub mod server;

pub use server::{router, run_api_server, ApiConfig, AppState};
