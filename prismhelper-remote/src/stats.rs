//! Library statistics query and field filtering.

use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;

/// Stats endpoint below the API base.
pub const STATS_ENDPOINT: &str = "stats";

/// Field selection applied to the remote stats body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsFilter {
    fields: BTreeSet<String>,
}

impl StatsFilter {
    /// Creates a filter selecting `fields`.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Builds a filter from the keys of a request body.
    ///
    /// Anything but a JSON object selects nothing.
    pub fn from_request_body(body: &Value) -> Self {
        match body {
            Value::Object(map) => Self::new(map.keys().cloned()),
            _ => Self::default(),
        }
    }

    /// Returns true when no fields are selected.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the selected field names.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(String::as_str)
    }

    /// Projects `body` onto the selected fields.
    ///
    /// Returns `body` unchanged when it is not an object, the filter is
    /// empty, or none of the selected fields is present.
    pub fn apply(&self, body: Value) -> Value {
        if self.is_empty() {
            return body;
        }
        let Value::Object(map) = body else {
            return body;
        };

        let selected: Map<String, Value> = map
            .iter()
            .filter(|(key, _)| self.fields.contains(*key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        if selected.is_empty() {
            Value::Object(map)
        } else {
            Value::Object(selected)
        }
    }
}

/// Body of a stats response.
#[derive(Debug, Clone, PartialEq)]
pub enum StatsBody {
    /// A JSON document.
    Json(Value),
    /// A body that is not JSON, kept byte for byte.
    Raw {
        /// Content type reported by the remote, if any.
        content_type: Option<String>,
        /// Body text.
        text: String,
    },
}

impl StatsBody {
    /// Returns the JSON document, if the body is one.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(value) => Some(value),
            Self::Raw { .. } => None,
        }
    }
}

impl PartialEq<Value> for StatsBody {
    fn eq(&self, other: &Value) -> bool {
        self.as_json() == Some(other)
    }
}

impl fmt::Display for StatsBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json(value) => write!(f, "{value:#}"),
            Self::Raw { text, .. } => f.write_str(text),
        }
    }
}

/// Status and body to hand back to the caller of a stats query.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: StatsBody,
}

impl StatsResponse {
    /// Creates a response with a JSON body.
    pub fn new(status: u16, body: Value) -> Self {
        Self {
            status,
            body: StatsBody::Json(body),
        }
    }

    /// Creates a response with a non-JSON body.
    pub fn raw(status: u16, content_type: Option<String>, text: impl Into<String>) -> Self {
        Self {
            status,
            body: StatsBody::Raw {
                content_type,
                text: text.into(),
            },
        }
    }

    /// Returns true for 2xx statuses.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
