//! Log shipping to an external collector.
//!
//! [`ShippingLayer`] turns tracing events into JSON records and queues them
//! for a background task that POSTs each one with a bearer key. Shipping is
//! best effort: a full queue or a failed POST drops the record.

use chrono::Utc;
use prismhelper_config::ShipTarget;
use prismhelper_remote::OUTCOME_LOG_TARGET;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::field::{Field, Visit};
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Layer};

/// Records waiting to be shipped before new ones are dropped.
const QUEUE_CAPACITY: usize = 1024;

/// Per-record POST timeout.
const SHIP_TIMEOUT: Duration = Duration::from_secs(10);

/// Targets never shipped, so the shipper cannot log about itself.
const IGNORED_TARGETS: &[&str] = &["reqwest", "hyper", "h2", "rustls", module_path!()];

// ============================================================================
// Identity
// ============================================================================

/// Who is sending the records.
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    /// Host identifier.
    pub identifier: String,
    /// Deployment environment.
    pub environment: String,
    /// Application version.
    pub version: &'static str,
    /// Options summary, when sharing is enabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
}

impl Identity {
    /// Placeholder for identifying fields when anonymised.
    pub const ANONYMISED: &'static str = "anonymised";

    /// Builds an identity, blanking identifying fields when `anonymised`.
    pub fn new(
        identifier: impl Into<String>,
        environment: impl Into<String>,
        options: Option<Value>,
        anonymised: bool,
    ) -> Self {
        let (identifier, environment) = if anonymised {
            (Self::ANONYMISED.to_string(), Self::ANONYMISED.to_string())
        } else {
            (identifier.into(), environment.into())
        };
        Self {
            identifier,
            environment,
            version: env!("CARGO_PKG_VERSION"),
            options,
        }
    }
}

#[derive(Serialize)]
struct LogRecord<'a> {
    timestamp: String,
    level: String,
    target: &'a str,
    message: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    fields: Map<String, Value>,
    identity: &'a Identity,
}

// ============================================================================
// Shipping Layer
// ============================================================================

/// Tracing layer that queues events for an external collector.
pub struct ShippingLayer {
    sender: mpsc::Sender<Value>,
    identity: Arc<Identity>,
    outcomes_only: bool,
}

impl ShippingLayer {
    /// Starts the shipper task for `target` and returns the layer feeding it.
    ///
    /// Must be called inside a tokio runtime.
    pub fn spawn(target: &ShipTarget, identity: Arc<Identity>, outcomes_only: bool) -> reqwest::Result<Self> {
        let client = reqwest::Client::builder().timeout(SHIP_TIMEOUT).build()?;
        let (sender, receiver) = mpsc::channel(QUEUE_CAPACITY);
        tokio::spawn(ship(client, target.clone(), receiver));
        Ok(Self::with_sender(sender, identity, outcomes_only))
    }

    fn with_sender(sender: mpsc::Sender<Value>, identity: Arc<Identity>, outcomes_only: bool) -> Self {
        Self {
            sender,
            identity,
            outcomes_only,
        }
    }

    fn ships(&self, metadata: &Metadata<'_>) -> bool {
        let target = metadata.target();
        if IGNORED_TARGETS.iter().any(|ignored| target.starts_with(ignored)) {
            return false;
        }
        !self.outcomes_only || target == OUTCOME_LOG_TARGET
    }
}

impl<S: Subscriber> Layer<S> for ShippingLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if !self.ships(metadata) {
            return;
        }

        let mut visitor = RecordVisitor::default();
        event.record(&mut visitor);

        let record = LogRecord {
            timestamp: Utc::now().to_rfc3339(),
            level: metadata.level().to_string().to_lowercase(),
            target: metadata.target(),
            message: visitor.message,
            fields: visitor.fields,
            identity: &self.identity,
        };

        if let Ok(value) = serde_json::to_value(&record) {
            let _ = self.sender.try_send(value);
        }
    }
}

#[derive(Default)]
struct RecordVisitor {
    message: String,
    fields: Map<String, Value>,
}

impl Visit for RecordVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.fields.insert(field.name().to_string(), Value::from(value));
        }
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.fields.insert(field.name().to_string(), Value::from(value));
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.fields
                .insert(field.name().to_string(), Value::from(format!("{value:?}")));
        }
    }
}

async fn ship(client: reqwest::Client, target: ShipTarget, mut receiver: mpsc::Receiver<Value>) {
    while let Some(record) = receiver.recv().await {
        let _ = client
            .post(target.url.clone())
            .bearer_auth(&target.key)
            .json(&record)
            .send()
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::prelude::*;

    // Events from this module are never shipped, so tests set their own targets.
    fn capture(outcomes_only: bool, emit: impl FnOnce()) -> Vec<Value> {
        let (sender, mut receiver) = mpsc::channel(16);
        let identity = Arc::new(Identity::new("nas", "docker", None, false));
        let layer = ShippingLayer::with_sender(sender, identity, outcomes_only);

        tracing::subscriber::with_default(tracing_subscriber::registry().with(layer), emit);

        let mut records = Vec::new();
        while let Ok(record) = receiver.try_recv() {
            records.push(record);
        }
        records
    }

    #[test]
    fn test_records_carry_message_fields_and_identity() {
        let records = capture(false, || {
            tracing::warn!(target: "prismhelper::http", code = 401_u64, "Authentication failed");
        });

        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record["message"], "Authentication failed");
        assert_eq!(record["level"], "warn");
        assert_eq!(record["fields"]["code"], 401);
        assert_eq!(record["identity"]["identifier"], "nas");
        assert!(record["identity"].get("options").is_none());
    }

    #[test]
    fn test_outcomes_only() {
        let records = capture(true, || {
            tracing::info!(target: "prismhelper::http", "Server started");
            tracing::info!(target: OUTCOME_LOG_TARGET, operation = "import", "done");
        });

        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["target"], OUTCOME_LOG_TARGET);
    }

    #[test]
    fn test_http_client_events_ignored() {
        let records = capture(false, || {
            tracing::info!(target: "hyper::client", "connecting");
        });
        assert!(records.is_empty());
    }

    #[test]
    fn test_anonymised_identity() {
        let identity = Identity::new("nas", "docker", Some(serde_json::json!({"a": 1})), true);
        assert_eq!(identity.identifier, Identity::ANONYMISED);
        assert_eq!(identity.environment, Identity::ANONYMISED);
        assert!(identity.options.is_some());
    }
}
