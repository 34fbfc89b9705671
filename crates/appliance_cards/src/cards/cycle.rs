//! The cycle/status card: current run of one appliance with alerts and
//! action buttons.

use std::time::Duration;

use serde_json::json;
use tracing::warn;

use crate::appliance::{self, ApplianceType, CycleState, Terminology};
use crate::cards::config::{CardConfigError, CycleCardConfig};
use crate::cards::controller::Card;
use crate::cards::view::{
    Alert, CardAction, CardView, CycleView, Severity, StatusIndicator, ValueRow,
};
use crate::entities::RelatedEntities;
use crate::format;
use crate::store::{Host, MONITOR_DOMAIN, SERVICE_START_CYCLE};

/// Repaint period for the cycle card: running state changes by the second.
pub const FAST_REFRESH: Duration = Duration::from_secs(1);

pub struct CycleCard {
    config: CycleCardConfig,
    currency: String,
    entities: Option<RelatedEntities>,
    appliance_type: ApplianceType,
    terminology: Terminology,
}

impl CycleCard {
    /// Build a cycle card, validating the configuration up front.
    pub fn new(config: CycleCardConfig, currency: &str) -> Result<Self, CardConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            currency: currency.to_string(),
            entities: None,
            appliance_type: ApplianceType::Generic,
            terminology: Terminology::Cycle,
        })
    }

    fn is_on(&self, host: &Host, entity_id: &str) -> bool {
        host.entity_state(entity_id).as_deref() == Some("on")
    }

    fn alerts(&self, host: &Host, entities: &RelatedEntities) -> Vec<Alert> {
        let unplugged = self.is_on(host, &entities.unplugged);
        let duration_alert = self.is_on(host, &entities.duration_alert);
        let monitoring = self.is_on(host, &entities.monitoring);

        let mut alerts = Vec::new();
        if unplugged {
            alerts.push(Alert {
                severity: Severity::Error,
                icon: "mdi:power-plug-off",
                message: "Appliance is unplugged or powered off".to_string(),
            });
        }
        if duration_alert {
            alerts.push(Alert {
                severity: Severity::Warning,
                icon: "mdi:alert",
                message: format!("{} duration exceeds expected time", self.terminology),
            });
        }
        if !monitoring && !unplugged {
            alerts.push(Alert {
                severity: Severity::Info,
                icon: "mdi:information",
                message: "Monitoring is currently disabled".to_string(),
            });
        }
        alerts
    }

    fn values(&self, host: &Host, entities: &RelatedEntities) -> Vec<ValueRow> {
        let duration = host.numeric_state(&entities.cycle_duration).unwrap_or(0.0);
        let energy = host.numeric_state(&entities.cycle_energy).unwrap_or(0.0);
        let cost = host.numeric_state(&entities.cycle_cost).unwrap_or(0.0);

        let mut values = vec![
            ValueRow {
                icon: "mdi:timer-outline",
                label: "Duration",
                value: format::duration(duration, false),
            },
            ValueRow {
                icon: "mdi:lightning-bolt",
                label: "Energy",
                value: format::energy(energy, 2),
            },
            ValueRow {
                icon: "mdi:currency-eur",
                label: "Cost",
                value: format::cost(cost, &self.currency, 2),
            },
        ];

        if self.config.show_current_power {
            // The integration exposes the tracked power reading as an
            // attribute of the state sensor, not as a derived entity.
            let watts = host
                .attribute(&entities.state, "current_power")
                .and_then(|v| v.as_f64())
                .unwrap_or(0.0);
            values.push(ValueRow {
                icon: "mdi:flash",
                label: "Power",
                value: format::power(watts, 0),
            });
        }

        values
    }

    fn actions(&self, state: CycleState) -> Vec<CardAction> {
        if !self.config.show_action_buttons {
            return Vec::new();
        }

        let mut actions = Vec::new();
        if state == CycleState::Idle {
            actions.push(CardAction::StartCycle);
        }
        if state == CycleState::Running {
            actions.push(CardAction::StopMonitoring);
        }
        if matches!(state, CycleState::Idle | CycleState::Finished) {
            actions.push(CardAction::ResetStats);
        }
        actions
    }

    fn display_name(&self, host: &Host) -> String {
        if let Some(name) = &self.config.name {
            return name.clone();
        }
        host.attribute(&self.config.entity, "friendly_name")
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| "Appliance".to_string())
    }
}

impl Card for CycleCard {
    fn name(&self) -> &'static str {
        "cycle"
    }

    fn refresh_interval(&self) -> Duration {
        FAST_REFRESH
    }

    fn refresh_bindings(&mut self, host: &Host) {
        self.entities = RelatedEntities::resolve(&self.config.entity);
        self.appliance_type =
            appliance::classify(host.entity(&self.config.entity).as_ref(), &self.config.entity);
        self.terminology = self.appliance_type.terminology();
    }

    fn set_entity(&mut self, entity: String) {
        self.config.entity = entity;
    }

    fn handle_action(&mut self, action: CardAction, host: &Host) {
        let Some(entities) = &self.entities else {
            return;
        };

        let result = match action {
            CardAction::StartCycle => host.call_service(
                MONITOR_DOMAIN,
                SERVICE_START_CYCLE,
                json!({ "entity_id": entities.state }),
            ),
            CardAction::StopMonitoring => host.call_service(
                "switch",
                "turn_off",
                json!({ "entity_id": entities.monitoring }),
            ),
            CardAction::ResetStats => host.call_service(
                "button",
                "press",
                json!({ "entity_id": entities.reset_stats }),
            ),
        };

        if let Err(e) = result {
            warn!("cycle card action dropped: {e}");
        }
    }

    fn render(&self, host: &Host) -> CardView {
        let Some(entities) = &self.entities else {
            return CardView::EntityNotFound {
                entity: self.config.entity.clone(),
            };
        };

        let state = CycleState::parse(host.entity_state(&entities.state).as_deref());

        CardView::Cycle(CycleView {
            name: self.display_name(host),
            icon: self
                .config
                .icon
                .clone()
                .unwrap_or_else(|| self.appliance_type.icon().to_string()),
            alerts: self.alerts(host, entities),
            status: StatusIndicator {
                state,
                color: state.color(),
                icon: state.icon(),
                terminology: self.terminology,
            },
            values: self.values(host, entities),
            actions: self.actions(state),
            show_power_graph: self.config.show_power_graph,
            graph_hours: self.config.graph_hours,
        })
    }
}
