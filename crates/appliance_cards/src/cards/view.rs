//! Declarative render output.
//!
//! A render pass produces a plain-data `CardView` tree; the host frontend
//! turns it into markup. Nothing here touches the store.

use serde::Serialize;

use crate::appliance::{CycleState, Terminology};
use crate::cards::config::Period;
use crate::trend::Trend;

/// The full output of one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CardView {
    /// No render pass has produced output yet.
    Loading,
    /// The configured entity id matched neither naming convention.
    EntityNotFound { entity: String },
    Cycle(CycleView),
    Stats(StatsView),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

/// A banner above the card body. Alerts are independent; several can be
/// displayed at once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub severity: Severity,
    pub icon: &'static str,
    pub message: String,
}

/// One labelled value line in the cycle card body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueRow {
    pub icon: &'static str,
    pub label: &'static str,
    pub value: String,
}

/// Buttons the cycle card may offer, gated by the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CardAction {
    StartCycle,
    StopMonitoring,
    ResetStats,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusIndicator {
    pub state: CycleState,
    pub color: &'static str,
    pub icon: &'static str,
    pub terminology: Terminology,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleView {
    pub name: String,
    pub icon: String,
    pub alerts: Vec<Alert>,
    pub status: StatusIndicator,
    pub values: Vec<ValueRow>,
    pub actions: Vec<CardAction>,
    pub show_power_graph: bool,
    pub graph_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendBadge {
    pub trend: Trend,
    /// Pre-formatted percentage, e.g. `+20%`.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatTile {
    pub icon: &'static str,
    pub label: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendBadge>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EfficiencyItem {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsView {
    pub name: String,
    pub icon: String,
    pub active_tab: Period,
    pub tiles: Vec<StatTile>,
    /// Present on the week/month tabs, whose totals are a single day's
    /// reading multiplied out pending real history aggregates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_note: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub efficiency: Option<Vec<EfficiencyItem>>,
}
