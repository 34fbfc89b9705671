//! Per-card configuration objects.
//!
//! Defaults mirror what the cards assume when an option is omitted. A config
//! is validated synchronously before any mount; a missing entity is fatal at
//! configuration time, not at render time.

use serde::{Deserialize, Serialize};
use strum::Display;

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum CardConfigError {
    #[error("card configuration requires an entity")]
    MissingEntity,

    #[error("graph_hours must be between 0.25 and 2 in steps of 0.25, got {0}")]
    InvalidGraphHours(f64),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Auto,
    Light,
    Dark,
}

/// Statistics tab selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Today,
    Week,
    Month,
}

/// Chart style for the stats card. Accepted for forward compatibility;
/// the rendered view does not carry it yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Bar,
    Line,
}

fn default_true() -> bool {
    true
}

fn default_graph_hours() -> f64 {
    0.5
}

/// Configuration for the cycle/status card.
#[derive(Debug, Clone, Deserialize)]
pub struct CycleCardConfig {
    /// Canonical state entity of the appliance to display.
    pub entity: String,

    /// Display name override; defaults to the entity's friendly name.
    #[serde(default)]
    pub name: Option<String>,

    /// Icon override; defaults to the classified appliance type's icon.
    #[serde(default)]
    pub icon: Option<String>,

    #[serde(default = "default_true")]
    pub show_power_graph: bool,

    #[serde(default = "default_true")]
    pub show_action_buttons: bool,

    #[serde(default)]
    pub show_current_power: bool,

    /// Power graph window in hours, 0.25 to 2 in 0.25 steps.
    #[serde(default = "default_graph_hours")]
    pub graph_hours: f64,

    #[serde(default)]
    pub theme: Theme,
}

impl CycleCardConfig {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            name: None,
            icon: None,
            show_power_graph: true,
            show_action_buttons: true,
            show_current_power: false,
            graph_hours: default_graph_hours(),
            theme: Theme::default(),
        }
    }

    pub fn validate(&self) -> Result<(), CardConfigError> {
        if self.entity.is_empty() {
            return Err(CardConfigError::MissingEntity);
        }
        let quarters = self.graph_hours * 4.0;
        if !(0.25..=2.0).contains(&self.graph_hours) || (quarters - quarters.round()).abs() > 1e-9 {
            return Err(CardConfigError::InvalidGraphHours(self.graph_hours));
        }
        Ok(())
    }
}

/// Configuration for the statistics card.
#[derive(Debug, Clone, Deserialize)]
pub struct StatsCardConfig {
    /// Canonical state entity of the appliance to display.
    pub entity: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub icon: Option<String>,

    #[serde(default)]
    pub default_tab: Period,

    #[serde(default = "default_true")]
    pub show_trends: bool,

    #[serde(default = "default_true")]
    pub show_efficiency: bool,

    #[serde(default)]
    pub chart_type: ChartType,

    #[serde(default)]
    pub theme: Theme,
}

impl StatsCardConfig {
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            name: None,
            icon: None,
            default_tab: Period::default(),
            show_trends: true,
            show_efficiency: true,
            chart_type: ChartType::default(),
            theme: Theme::default(),
        }
    }

    pub fn validate(&self) -> Result<(), CardConfigError> {
        if self.entity.is_empty() {
            return Err(CardConfigError::MissingEntity);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_defaults() {
        let config: CycleCardConfig =
            toml::from_str(r#"entity = "sensor.washing_machine_state""#).unwrap();
        assert!(config.show_power_graph);
        assert!(config.show_action_buttons);
        assert!(!config.show_current_power);
        assert_eq!(config.graph_hours, 0.5);
        assert_eq!(config.theme, Theme::Auto);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_stats_defaults() {
        let config: StatsCardConfig =
            toml::from_str(r#"entity = "sensor.washing_machine_state""#).unwrap();
        assert_eq!(config.default_tab, Period::Today);
        assert!(config.show_trends);
        assert!(config.show_efficiency);
        assert_eq!(config.chart_type, ChartType::Bar);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_entity_is_required() {
        // Absent at parse time
        assert!(toml::from_str::<CycleCardConfig>("name = \"Washer\"").is_err());
        // Empty at validation time
        let config = CycleCardConfig::new("");
        assert_eq!(config.validate(), Err(CardConfigError::MissingEntity));
        let config = StatsCardConfig::new("");
        assert_eq!(config.validate(), Err(CardConfigError::MissingEntity));
    }

    #[test]
    fn test_graph_hours_range_and_step() {
        let mut config = CycleCardConfig::new("sensor.x_state");
        for hours in [0.25, 0.5, 1.0, 1.75, 2.0] {
            config.graph_hours = hours;
            assert!(config.validate().is_ok(), "expected {hours} to be valid");
        }
        for hours in [0.0, 0.3, 2.25, -0.5] {
            config.graph_hours = hours;
            assert_eq!(
                config.validate(),
                Err(CardConfigError::InvalidGraphHours(hours))
            );
        }
    }

    #[test]
    fn test_enum_options_parse() {
        let config: StatsCardConfig = toml::from_str(
            r#"
            entity = "sensor.dryer_state"
            default_tab = "month"
            chart_type = "line"
            theme = "dark"
            "#,
        )
        .unwrap();
        assert_eq!(config.default_tab, Period::Month);
        assert_eq!(config.chart_type, ChartType::Line);
        assert_eq!(config.theme, Theme::Dark);
    }
}
