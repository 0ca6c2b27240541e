//! Domain models for `PrismHelper`.
//!
//! ## Submodules
//!
//! - [`outcome`] - The uniform operation result
//! - [`credentials`] - Remote credentials and session tokens
//! - [`operation`] - Library operations and execution modes

mod credentials;
mod operation;
mod outcome;

pub use credentials::{Credentials, SessionToken};
pub use operation::{ExecutionMode, Operation};
pub use outcome::{
    INVALID_CREDENTIALS_MESSAGE, Outcome, SUCCESS_MESSAGE_NOT_FOUND, UNKNOWN_ERROR_MESSAGE,
    UNKNOWN_INTERNAL_ERROR_MESSAGE,
};
