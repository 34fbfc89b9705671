//! The statistics card: tabbed today/week/month totals with trend badges
//! and an efficiency section.

use std::time::Duration;

use crate::appliance::{self, ApplianceType, Terminology};
use crate::cards::config::{CardConfigError, Period, StatsCardConfig};
use crate::cards::controller::Card;
use crate::cards::view::{CardView, EfficiencyItem, StatTile, StatsView, TrendBadge};
use crate::entities::RelatedEntities;
use crate::format;
use crate::store::Host;
use crate::trend;

/// Repaint period for the stats card: daily aggregates move slowly.
pub const SLOW_REFRESH: Duration = Duration::from_secs(30);

const WEEK_HISTORY_NOTE: &str = "Weekly statistics require history data";
const MONTH_HISTORY_NOTE: &str = "Monthly statistics require history data";

pub struct StatsCard {
    config: StatsCardConfig,
    currency: String,
    entities: Option<RelatedEntities>,
    appliance_type: ApplianceType,
    terminology: Terminology,
    active_tab: Period,
}

impl StatsCard {
    /// Build a stats card, validating the configuration up front.
    pub fn new(config: StatsCardConfig, currency: &str) -> Result<Self, CardConfigError> {
        config.validate()?;
        let active_tab = config.default_tab;
        Ok(Self {
            config,
            currency: currency.to_string(),
            entities: None,
            appliance_type: ApplianceType::Generic,
            terminology: Terminology::Cycle,
            active_tab,
        })
    }

    fn reading(&self, host: &Host, entity_id: &str) -> f64 {
        host.numeric_state(entity_id).unwrap_or(0.0)
    }

    fn today_tiles(&self, host: &Host, entities: &RelatedEntities) -> Vec<StatTile> {
        let cycles = self.reading(host, &entities.daily_cycles);
        let cost = self.reading(host, &entities.daily_cost);
        let last_energy = self.reading(host, &entities.last_cycle_energy);
        let last_duration = self.reading(host, &entities.last_cycle_duration);

        // Yesterday's count is not exposed by the backend, so the trend is
        // computed against a one-less placeholder until history lands.
        let trend_badge = if self.config.show_trends {
            let t = trend::trend(cycles, (cycles - 1.0).max(0.0));
            Some(TrendBadge {
                trend: t,
                label: format::percent(Some(t.percentage), true),
            })
        } else {
            None
        };

        vec![
            StatTile {
                icon: "mdi:counter",
                label: format!("{}s", self.terminology),
                value: format::number(Some(cycles), 0),
                trend: trend_badge,
            },
            StatTile {
                icon: "mdi:lightning-bolt",
                label: "Energy".to_string(),
                value: format::energy(last_energy * cycles, 2),
                trend: None,
            },
            StatTile {
                icon: "mdi:currency-eur",
                label: "Cost".to_string(),
                value: format::cost(cost, &self.currency, 2),
                trend: None,
            },
            StatTile {
                icon: "mdi:timer",
                label: "Avg Duration".to_string(),
                value: format::duration(last_duration, true),
                trend: None,
            },
        ]
    }

    fn week_tiles(&self, host: &Host, entities: &RelatedEntities) -> Vec<StatTile> {
        let cycles = self.reading(host, &entities.daily_cycles) * 7.0;
        let cost = self.reading(host, &entities.daily_cost) * 7.0;
        let energy = self.reading(host, &entities.last_cycle_energy) * cycles;

        vec![
            StatTile {
                icon: "mdi:counter",
                label: format!("Total {}s", self.terminology),
                value: format::number(Some(cycles), 0),
                trend: None,
            },
            StatTile {
                icon: "mdi:lightning-bolt",
                label: "Total Energy".to_string(),
                value: format::energy(energy, 2),
                trend: None,
            },
            StatTile {
                icon: "mdi:currency-eur",
                label: "Total Cost".to_string(),
                value: format::cost(cost, &self.currency, 2),
                trend: None,
            },
        ]
    }

    fn month_tiles(&self, host: &Host, entities: &RelatedEntities) -> Vec<StatTile> {
        let cycles = self.reading(host, &entities.daily_cycles) * 30.0;
        let energy = self.reading(host, &entities.last_cycle_energy) * cycles;
        let monthly_cost = self.reading(host, &entities.monthly_cost);

        vec![
            StatTile {
                icon: "mdi:counter",
                label: format!("Total {}s", self.terminology),
                value: format::number(Some(cycles), 0),
                trend: None,
            },
            StatTile {
                icon: "mdi:lightning-bolt",
                label: "Total Energy".to_string(),
                value: format::energy(energy, 2),
                trend: None,
            },
            StatTile {
                icon: "mdi:currency-eur",
                label: "Monthly Cost".to_string(),
                value: format::cost(monthly_cost, &self.currency, 2),
                trend: None,
            },
        ]
    }

    fn efficiency(&self, host: &Host, entities: &RelatedEntities) -> Option<Vec<EfficiencyItem>> {
        if !self.config.show_efficiency {
            return None;
        }

        // Per-cycle averages stand in for real aggregates: the backend only
        // tracks the most recent cycle.
        let cost = self.reading(host, &entities.last_cycle_cost);
        let energy = self.reading(host, &entities.last_cycle_energy);
        let duration = self.reading(host, &entities.last_cycle_duration);

        Some(vec![
            EfficiencyItem {
                label: format!("Avg Cost/{}", self.terminology),
                value: format::cost(cost, &self.currency, 2),
            },
            EfficiencyItem {
                label: format!("Avg Energy/{}", self.terminology),
                value: format::energy(energy, 2),
            },
            EfficiencyItem {
                label: "Avg Duration".to_string(),
                value: format::duration(duration, true),
            },
        ])
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

impl Card for StatsCard {
    fn name(&self) -> &'static str {
        "stats"
    }

    fn refresh_interval(&self) -> Duration {
        SLOW_REFRESH
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

    fn select_tab(&mut self, tab: Period) {
        self.active_tab = tab;
    }

    fn render(&self, host: &Host) -> CardView {
        let Some(entities) = &self.entities else {
            return CardView::EntityNotFound {
                entity: self.config.entity.clone(),
            };
        };

        let (tiles, history_note) = match self.active_tab {
            Period::Today => (self.today_tiles(host, entities), None),
            Period::Week => (self.week_tiles(host, entities), Some(WEEK_HISTORY_NOTE)),
            Period::Month => (self.month_tiles(host, entities), Some(MONTH_HISTORY_NOTE)),
        };

        CardView::Stats(StatsView {
            name: self.display_name(host),
            icon: self
                .config
                .icon
                .clone()
                .unwrap_or_else(|| self.appliance_type.icon().to_string()),
            active_tab: self.active_tab,
            tiles,
            history_note,
            efficiency: self.efficiency(host, entities),
        })
    }
}
