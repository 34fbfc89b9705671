//! Dashboard card logic for the smart appliance monitor integration.
//!
//! Everything is derived from one canonical state entity id: the full set of
//! related entity ids, the appliance classification, and the per-tick view
//! each mounted card renders from the host's live state store.

pub mod appliance;
pub mod cards;
pub mod config;
pub mod entities;
pub mod format;
pub mod panel;
pub mod store;
pub mod trend;

pub use cards::{mount, Card, CardHandle, CardMessage, CycleCard, StatsCard};
pub use entities::{NamingLanguage, RelatedEntities};
pub use store::Host;
