//! Related-entity resolution for monitored appliances.
//!
//! One canonical state sensor (e.g. `sensor.washing_machine_state`) anchors a
//! whole family of sensors, binary sensors, switches and a button created by
//! the monitor integration alongside it. The family shares the appliance's
//! base name and one naming language; resolution is pure string construction
//! and never touches the host store.

use serde::Serialize;

/// Naming language of an appliance's entity family, discriminated by the
/// canonical state id suffix (`_state` vs `_etat`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingLanguage {
    English,
    French,
}

/// Per-role object-id suffixes for one naming language.
///
/// `notifications` happens to share its spelling across both languages; it
/// still lives in the table so every derived id is built the same way.
struct Vocabulary {
    cycle_duration: &'static str,
    cycle_energy: &'static str,
    cycle_cost: &'static str,
    last_cycle_duration: &'static str,
    last_cycle_energy: &'static str,
    last_cycle_cost: &'static str,
    daily_cycles: &'static str,
    daily_cost: &'static str,
    monthly_cost: &'static str,
    daily_energy: &'static str,
    monthly_energy: &'static str,
    running: &'static str,
    duration_alert: &'static str,
    unplugged: &'static str,
    monitoring: &'static str,
    notifications: &'static str,
    notify_started: &'static str,
    notify_finished: &'static str,
    notify_alert: &'static str,
    notify_unplugged: &'static str,
    reset_stats: &'static str,
}

const ENGLISH: Vocabulary = Vocabulary {
    cycle_duration: "cycle_duration",
    cycle_energy: "cycle_energy",
    cycle_cost: "cycle_cost",
    last_cycle_duration: "last_cycle_duration",
    last_cycle_energy: "last_cycle_energy",
    last_cycle_cost: "last_cycle_cost",
    daily_cycles: "daily_cycles",
    daily_cost: "daily_cost",
    monthly_cost: "monthly_cost",
    daily_energy: "daily_energy",
    monthly_energy: "monthly_energy",
    running: "running",
    duration_alert: "duration_alert",
    unplugged: "unplugged",
    monitoring: "monitoring",
    notifications: "notifications",
    notify_started: "notify_cycle_started",
    notify_finished: "notify_cycle_finished",
    notify_alert: "notify_alert_duration",
    notify_unplugged: "notify_unplugged",
    reset_stats: "reset_statistics",
};

const FRENCH: Vocabulary = Vocabulary {
    cycle_duration: "duree_du_cycle",
    cycle_energy: "energie_du_cycle",
    cycle_cost: "cout_du_cycle",
    last_cycle_duration: "duree_du_dernier_cycle",
    last_cycle_energy: "energie_du_dernier_cycle",
    last_cycle_cost: "cout_du_dernier_cycle",
    daily_cycles: "cycles_du_jour",
    daily_cost: "cout_du_jour",
    monthly_cost: "cout_du_mois",
    daily_energy: "energie_du_jour",
    monthly_energy: "energie_du_mois",
    running: "en_marche",
    duration_alert: "alerte_duree",
    unplugged: "debranche",
    monitoring: "surveillance",
    notifications: "notifications",
    notify_started: "notification_cycle_demarre",
    notify_finished: "notification_cycle_termine",
    notify_alert: "notification_alerte_duree",
    notify_unplugged: "notification_debranche",
    reset_stats: "reinitialiser_les_statistiques",
};

impl NamingLanguage {
    fn vocabulary(self) -> &'static Vocabulary {
        match self {
            NamingLanguage::English => &ENGLISH,
            NamingLanguage::French => &FRENCH,
        }
    }
}

/// The full set of entity ids belonging to one appliance, derived from its
/// canonical state sensor id. Immutable once resolved; resolving the same
/// canonical id always produces a structurally equal set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedEntities {
    language: NamingLanguage,
    /// Language-and-domain-stripped core token shared by the whole family.
    pub base: String,

    // Sensors
    pub state: String,
    pub cycle_duration: String,
    pub cycle_energy: String,
    pub cycle_cost: String,
    pub last_cycle_duration: String,
    pub last_cycle_energy: String,
    pub last_cycle_cost: String,
    pub daily_cycles: String,
    pub daily_cost: String,
    pub monthly_cost: String,
    pub daily_energy: String,
    pub monthly_energy: String,

    // Binary sensors
    pub running: String,
    pub duration_alert: String,
    pub unplugged: String,

    // Switches
    pub monitoring: String,
    pub notifications: String,
    pub notify_started: String,
    pub notify_finished: String,
    pub notify_alert: String,
    pub notify_unplugged: String,

    // Button
    pub reset_stats: String,
}

impl RelatedEntities {
    /// Resolve a canonical state id into the appliance's entity family.
    ///
    /// Accepts `sensor.<base>_state` (English) or `sensor.<base>_etat`
    /// (French) with a non-empty base; any other shape yields `None` and the
    /// caller renders its entity-not-found state.
    pub fn resolve(canonical: &str) -> Option<Self> {
        let object_id = canonical.strip_prefix("sensor.")?;
        let (base, language) = if let Some(base) = object_id.strip_suffix("_state") {
            (base, NamingLanguage::English)
        } else if let Some(base) = object_id.strip_suffix("_etat") {
            (base, NamingLanguage::French)
        } else {
            return None;
        };
        if base.is_empty() {
            return None;
        }

        let v = language.vocabulary();
        Some(Self {
            language,
            base: base.to_string(),
            state: canonical.to_string(),
            cycle_duration: format!("sensor.{base}_{}", v.cycle_duration),
            cycle_energy: format!("sensor.{base}_{}", v.cycle_energy),
            cycle_cost: format!("sensor.{base}_{}", v.cycle_cost),
            last_cycle_duration: format!("sensor.{base}_{}", v.last_cycle_duration),
            last_cycle_energy: format!("sensor.{base}_{}", v.last_cycle_energy),
            last_cycle_cost: format!("sensor.{base}_{}", v.last_cycle_cost),
            daily_cycles: format!("sensor.{base}_{}", v.daily_cycles),
            daily_cost: format!("sensor.{base}_{}", v.daily_cost),
            monthly_cost: format!("sensor.{base}_{}", v.monthly_cost),
            daily_energy: format!("sensor.{base}_{}", v.daily_energy),
            monthly_energy: format!("sensor.{base}_{}", v.monthly_energy),
            running: format!("binary_sensor.{base}_{}", v.running),
            duration_alert: format!("binary_sensor.{base}_{}", v.duration_alert),
            unplugged: format!("binary_sensor.{base}_{}", v.unplugged),
            monitoring: format!("switch.{base}_{}", v.monitoring),
            notifications: format!("switch.{base}_{}", v.notifications),
            notify_started: format!("switch.{base}_{}", v.notify_started),
            notify_finished: format!("switch.{base}_{}", v.notify_finished),
            notify_alert: format!("switch.{base}_{}", v.notify_alert),
            notify_unplugged: format!("switch.{base}_{}", v.notify_unplugged),
            reset_stats: format!("button.{base}_{}", v.reset_stats),
        })
    }

    pub fn language(&self) -> NamingLanguage {
        self.language
    }

    /// All `(role, entity_id)` pairs in the set, for diagnostics and tests.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("state", self.state.as_str()),
            ("cycle_duration", self.cycle_duration.as_str()),
            ("cycle_energy", self.cycle_energy.as_str()),
            ("cycle_cost", self.cycle_cost.as_str()),
            ("last_cycle_duration", self.last_cycle_duration.as_str()),
            ("last_cycle_energy", self.last_cycle_energy.as_str()),
            ("last_cycle_cost", self.last_cycle_cost.as_str()),
            ("daily_cycles", self.daily_cycles.as_str()),
            ("daily_cost", self.daily_cost.as_str()),
            ("monthly_cost", self.monthly_cost.as_str()),
            ("daily_energy", self.daily_energy.as_str()),
            ("monthly_energy", self.monthly_energy.as_str()),
            ("running", self.running.as_str()),
            ("duration_alert", self.duration_alert.as_str()),
            ("unplugged", self.unplugged.as_str()),
            ("monitoring", self.monitoring.as_str()),
            ("notifications", self.notifications.as_str()),
            ("notify_started", self.notify_started.as_str()),
            ("notify_finished", self.notify_finished.as_str()),
            ("notify_alert", self.notify_alert.as_str()),
            ("notify_unplugged", self.notify_unplugged.as_str()),
            ("reset_stats", self.reset_stats.as_str()),
        ]
        .into_iter()
    }
}
