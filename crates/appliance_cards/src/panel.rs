//! Integration config panel: enumerates monitored appliances and drives the
//! dashboard generation services, keeping a short activity log.

use std::collections::VecDeque;

use chrono::{DateTime, Local};
use serde_json::{json, Value};
use tracing::warn;

use crate::appliance::{self, ApplianceType};
use crate::entities::RelatedEntities;
use crate::store::{
    Host, MONITOR_DOMAIN, SERVICE_CONFIGURE_DASHBOARD, SERVICE_GENERATE_DASHBOARD_YAML,
};

/// Only the most recent activity is kept; the panel is not an audit trail.
const LOG_CAPACITY: usize = 10;

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub message: String,
}

/// Bounded activity log, oldest entries evicted first.
#[derive(Debug, Default)]
pub struct ServiceLog {
    entries: VecDeque<LogEntry>,
}

impl ServiceLog {
    pub fn push(&mut self, message: impl Into<String>) {
        self.entries.push_back(LogEntry {
            timestamp: Local::now(),
            message: message.into(),
        });
        while self.entries.len() > LOG_CAPACITY {
            self.entries.pop_front();
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A monitored appliance discovered in the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Appliance {
    /// Canonical state entity id.
    pub entity_id: String,
    pub name: String,
    pub appliance_type: ApplianceType,
}

pub struct ConfigPanel {
    host: Host,
    log: ServiceLog,
}

impl ConfigPanel {
    pub fn new(host: Host) -> Self {
        Self {
            host,
            log: ServiceLog::default(),
        }
    }

    /// Enumerate monitored appliances: every entity whose id matches a
    /// canonical state sensor in either naming convention and which carries
    /// a friendly name. Sorted by name for a stable listing.
    pub fn appliances(&self) -> Vec<Appliance> {
        let snapshot = self.host.snapshot();
        let mut appliances: Vec<Appliance> = snapshot
            .iter()
            .filter(|(entity_id, _)| RelatedEntities::resolve(entity_id).is_some())
            .filter_map(|(entity_id, state)| {
                let name = state.attributes.get("friendly_name")?.as_str()?;
                Some(Appliance {
                    entity_id: entity_id.clone(),
                    name: name.to_string(),
                    appliance_type: appliance::classify(Some(state), entity_id),
                })
            })
            .collect();
        appliances.sort_by(|a, b| a.name.cmp(&b.name));
        appliances
    }

    /// Generate the dashboard YAML file on the backend.
    pub fn generate_dashboard(&mut self) {
        self.log.push("Generating dashboard YAML file...");
        self.dispatch(
            SERVICE_GENERATE_DASHBOARD_YAML,
            json!({}),
            "Dashboard YAML generated, check notifications for setup instructions",
        );
    }

    /// Regenerate the dashboard YAML after configuration changes.
    pub fn rebuild_dashboard(&mut self) {
        self.log.push("Regenerating dashboard YAML file...");
        self.dispatch(
            SERVICE_GENERATE_DASHBOARD_YAML,
            json!({}),
            "Dashboard YAML regenerated, restart the host to apply",
        );
    }

    /// Push per-appliance dashboard options to the backend.
    pub fn configure_appliance(&mut self, appliance_id: &str, options: Value) {
        self.log.push(format!("Configuring {appliance_id}"));
        self.dispatch(
            SERVICE_CONFIGURE_DASHBOARD,
            json!({ "appliance_id": appliance_id, "options": options }),
            "Dashboard configuration updated",
        );
    }

    pub fn log(&self) -> &ServiceLog {
        &self.log
    }

    fn dispatch(&mut self, service: &str, data: Value, success: &str) {
        // Fire-and-forget like the cards: a failed send is logged for the
        // panel user and never retried.
        match self.host.call_service(MONITOR_DOMAIN, service, data) {
            Ok(()) => self.log.push(success),
            Err(e) => {
                warn!("panel dispatch failed: {e}");
                self.log.push(format!("Error: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::StateSnapshot;
    use serde_json::json;

    #[test]
    fn test_appliance_scan_matches_both_conventions() {
        let (host, _rx) = Host::new();
        host.set_state(
            "sensor.washing_machine_state",
            StateSnapshot::new("idle", json!({ "friendly_name": "Washing Machine" })),
        );
        host.set_state(
            "sensor.lave_vaisselle_etat",
            StateSnapshot::new(
                "running",
                json!({ "friendly_name": "Lave-vaisselle", "appliance_type": "dishwasher" }),
            ),
        );
        // State-shaped id without a friendly name is skipped
        host.set_state("sensor.mystery_state", StateSnapshot::new("idle", json!({})));
        // Unrelated entity is skipped
        host.set_state(
            "sensor.washing_machine_cycle_energy",
            StateSnapshot::new("0.8", json!({ "friendly_name": "Energy" })),
        );

        let panel = ConfigPanel::new(host);
        let appliances = panel.appliances();
        assert_eq!(appliances.len(), 2);
        assert_eq!(appliances[0].name, "Lave-vaisselle");
        assert_eq!(appliances[0].appliance_type, ApplianceType::Dishwasher);
        assert_eq!(appliances[1].entity_id, "sensor.washing_machine_state");
        assert_eq!(appliances[1].appliance_type, ApplianceType::WashingMachine);
    }

    #[test]
    fn test_generate_dashboard_dispatches_and_logs() {
        let (host, mut rx) = Host::new();
        let mut panel = ConfigPanel::new(host);

        panel.generate_dashboard();
        let call = rx.try_recv().unwrap();
        assert_eq!(call.domain, "smart_appliance_monitor");
        assert_eq!(call.service, "generate_dashboard_yaml");
        assert_eq!(call.data, json!({}));

        let messages: Vec<&str> = panel.log().entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("Generating"));
        assert!(messages[1].starts_with("Dashboard YAML generated"));
    }

    #[test]
    fn test_configure_appliance_payload() {
        let (host, mut rx) = Host::new();
        let mut panel = ConfigPanel::new(host);

        panel.configure_appliance("sensor.dryer_state", json!({ "show_power_graph": false }));
        let call = rx.try_recv().unwrap();
        assert_eq!(call.service, "configure_dashboard");
        assert_eq!(
            call.data,
            json!({
                "appliance_id": "sensor.dryer_state",
                "options": { "show_power_graph": false },
            })
        );
    }

    #[test]
    fn test_dispatch_failure_is_logged_not_retried() {
        let (host, rx) = Host::new();
        drop(rx);
        let mut panel = ConfigPanel::new(host);

        panel.generate_dashboard();
        let messages: Vec<&str> = panel.log().entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages.len(), 2);
        assert!(messages[1].starts_with("Error:"));
    }

    #[test]
    fn test_log_evicts_oldest_past_capacity() {
        let mut log = ServiceLog::default();
        for i in 0..15 {
            log.push(format!("entry {i}"));
        }
        assert_eq!(log.len(), 10);
        let first = log.entries().next().unwrap();
        assert_eq!(first.message, "entry 5");
        let last = log.entries().last().unwrap();
        assert_eq!(last.message, "entry 14");
    }
}
