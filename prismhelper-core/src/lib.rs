// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `PrismHelper` Core
//!
//! Core types shared by every `PrismHelper` crate.
//!
//! ## Key Types
//!
//! ### Outcome
//! - [`Outcome`] - Uniform `{code, message}` result of every remote operation
//!
//! ### Credentials
//! - [`Credentials`] - Remote username/password (password never printed)
//! - [`SessionToken`] - Single-use session identifier issued by the remote server
//!
//! ### Operations
//! - [`Operation`] - The library operations that can be triggered
//! - [`ExecutionMode`] - Which executor performs operations (API or browser)

pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    Credentials, ExecutionMode, Operation, Outcome, SessionToken, INVALID_CREDENTIALS_MESSAGE,
    SUCCESS_MESSAGE_NOT_FOUND, UNKNOWN_ERROR_MESSAGE, UNKNOWN_INTERNAL_ERROR_MESSAGE,
};
