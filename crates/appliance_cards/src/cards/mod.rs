//! Dashboard cards and their mount lifecycle.

pub mod config;
mod controller;
mod cycle;
mod stats;
pub mod view;

pub use controller::{mount, Card, CardHandle, CardMessage};
pub use cycle::{CycleCard, FAST_REFRESH};
pub use stats::{StatsCard, SLOW_REFRESH};
