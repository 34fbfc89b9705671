//! Host state store handle and outbound service dispatch.
//!
//! The host owns the live entity map; this crate only reads it. Readers load
//! the current `Arc` snapshot (an atomic refcount bump), the host-side writer
//! stores a new one. Outbound service calls are fire-and-forget over an
//! unbounded channel: dispatch must never block a render pass, and whether
//! the appliance physically acted on a command is decoupled from whether the
//! command was sent.

use std::collections::HashMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::mpsc;

/// Domain of the monitor integration's own services.
pub const MONITOR_DOMAIN: &str = "smart_appliance_monitor";
pub const SERVICE_START_CYCLE: &str = "start_cycle";
pub const SERVICE_GENERATE_DASHBOARD_YAML: &str = "generate_dashboard_yaml";
pub const SERVICE_CONFIGURE_DASHBOARD: &str = "configure_dashboard";

/// One entity's live reading as exposed by the host.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub state: String,
    #[serde(default)]
    pub attributes: Value,
}

impl StateSnapshot {
    pub fn new(state: impl Into<String>, attributes: Value) -> Self {
        Self {
            state: state.into(),
            attributes,
        }
    }
}

pub type StateMap = HashMap<String, StateSnapshot>;

/// Outbound remote service invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    pub data: Value,
}

pub type ServiceCallReceiver = mpsc::UnboundedReceiver<ServiceCall>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceCallError {
    #[error("host connection closed, dropped call to {0}.{1}")]
    Closed(String, String),
}

/// Cloneable handle to the host's live state map plus the outbound service
/// channel.
///
/// `set_state`/`remove_entity` are the host-side writer used by the embedded
/// simulator and by tests; cards never write.
#[derive(Debug, Clone)]
pub struct Host {
    states: Arc<ArcSwap<StateMap>>,
    service_tx: mpsc::UnboundedSender<ServiceCall>,
}

impl Host {
    /// Create a host handle together with the receiving end of the service
    /// channel (consumed by the backend integration).
    pub fn new() -> (Self, ServiceCallReceiver) {
        let (service_tx, service_rx) = mpsc::unbounded_channel();
        (
            Self {
                states: Arc::new(ArcSwap::new(Arc::default())),
                service_tx,
            },
            service_rx,
        )
    }

    /// Current full snapshot. Cheap; used by controllers to detect store
    /// changes via pointer identity.
    pub fn snapshot(&self) -> Arc<StateMap> {
        self.states.load_full()
    }

    pub fn entity(&self, entity_id: &str) -> Option<StateSnapshot> {
        self.states.load().get(entity_id).cloned()
    }

    pub fn entity_state(&self, entity_id: &str) -> Option<String> {
        self.states.load().get(entity_id).map(|s| s.state.clone())
    }

    pub fn attribute(&self, entity_id: &str, name: &str) -> Option<Value> {
        self.states
            .load()
            .get(entity_id)
            .and_then(|s| s.attributes.get(name).cloned())
    }

    /// Numeric reading for an entity. `None` for a missing entity, the
    /// host's "unknown"/"unavailable" placeholders, or a non-numeric state:
    /// absence is distinct from zero.
    pub fn numeric_state(&self, entity_id: &str) -> Option<f64> {
        let state = self.entity_state(entity_id)?;
        match state.as_str() {
            "unknown" | "unavailable" => None,
            s => s.trim().parse::<f64>().ok(),
        }
    }

    /// Fire-and-forget remote service call. The only reportable failure is a
    /// closed host connection; the result of the command itself is never
    /// consumed here.
    pub fn call_service(
        &self,
        domain: &str,
        service: &str,
        data: Value,
    ) -> Result<(), ServiceCallError> {
        let call = ServiceCall {
            domain: domain.to_string(),
            service: service.to_string(),
            data,
        };
        self.service_tx.send(call).map_err(|e| {
            let call = e.0;
            ServiceCallError::Closed(call.domain, call.service)
        })
    }

    /// Host-side writer: publish a new reading for one entity.
    pub fn set_state(&self, entity_id: impl Into<String>, snapshot: StateSnapshot) {
        let mut next = StateMap::clone(&self.states.load());
        next.insert(entity_id.into(), snapshot);
        self.states.store(Arc::new(next));
    }

    /// Host-side writer: drop an entity entirely.
    pub fn remove_entity(&self, entity_id: &str) {
        let mut next = StateMap::clone(&self.states.load());
        next.remove(entity_id);
        self.states.store(Arc::new(next));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_numeric_state() {
        let (host, _rx) = Host::new();
        host.set_state("sensor.a", StateSnapshot::new("12.5", json!({})));
        host.set_state("sensor.b", StateSnapshot::new("unknown", json!({})));
        host.set_state("sensor.c", StateSnapshot::new("unavailable", json!({})));
        host.set_state("sensor.d", StateSnapshot::new("idle", json!({})));
        host.set_state("sensor.e", StateSnapshot::new("0", json!({})));

        assert_eq!(host.numeric_state("sensor.a"), Some(12.5));
        assert_eq!(host.numeric_state("sensor.b"), None);
        assert_eq!(host.numeric_state("sensor.c"), None);
        assert_eq!(host.numeric_state("sensor.d"), None);
        // Zero is a reading, not an absence
        assert_eq!(host.numeric_state("sensor.e"), Some(0.0));
        assert_eq!(host.numeric_state("sensor.missing"), None);
    }

    #[test]
    fn test_attribute_lookup() {
        let (host, _rx) = Host::new();
        host.set_state(
            "sensor.a",
            StateSnapshot::new("running", json!({ "friendly_name": "Washer", "current_power": 1800.0 })),
        );

        assert_eq!(
            host.attribute("sensor.a", "friendly_name"),
            Some(json!("Washer"))
        );
        assert_eq!(host.attribute("sensor.a", "nope"), None);
        assert_eq!(host.attribute("sensor.missing", "friendly_name"), None);
    }

    #[test]
    fn test_snapshot_pointer_identity_tracks_writes() {
        let (host, _rx) = Host::new();
        let before = host.snapshot();
        assert!(Arc::ptr_eq(&before, &host.snapshot()));

        host.set_state("sensor.a", StateSnapshot::new("idle", json!({})));
        assert!(!Arc::ptr_eq(&before, &host.snapshot()));
    }

    #[tokio::test]
    async fn test_call_service_delivers() {
        let (host, mut rx) = Host::new();
        host.call_service("switch", "turn_off", json!({ "entity_id": "switch.x" }))
            .unwrap();

        let call = rx.recv().await.unwrap();
        assert_eq!(call.domain, "switch");
        assert_eq!(call.service, "turn_off");
        assert_eq!(call.data, json!({ "entity_id": "switch.x" }));
    }

    #[test]
    fn test_call_service_reports_closed_host() {
        let (host, rx) = Host::new();
        drop(rx);
        let err = host
            .call_service("button", "press", json!({}))
            .unwrap_err();
        assert!(err.to_string().contains("button.press"));
    }
}
