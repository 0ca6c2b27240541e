//! HTTP relay.
//!
//! Request path: rate limiter, then bearer-key check, then handler. Only
//! `/health` skips the key check.

pub mod auth;
pub mod handlers;
pub mod rate_limit;
pub mod routes;
pub mod server;
pub mod types;

pub use server::HttpServer;
