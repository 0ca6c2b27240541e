//! Remote credentials and session tokens.

use serde::Serialize;
use std::fmt;

// ============================================================================
// Credentials
// ============================================================================

/// Username and password for the remote PhotoPrism server.
///
/// Built once from configuration and never mutated. The password is left out
/// of `Debug` output so credentials can sit inside logged structs.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// Account name.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Creates a credential pair.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

// ============================================================================
// Session Token
// ============================================================================

/// Opaque session identifier issued by one authentication call.
///
/// Not `Clone`: a token is consumed by the single request it authorizes and
/// a fresh one is obtained for every operation.
#[derive(PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wraps a raw session id. Returns `None` for blank ids.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    /// Consumes the token, returning the raw id for a request header.
    pub fn into_header_value(self) -> String {
        self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}
