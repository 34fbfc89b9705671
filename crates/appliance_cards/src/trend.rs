//! Trend calculation between a current and a reference reading.

use serde::Serialize;
use strum::Display;

/// Delta (in percent) a reading must move before it counts as a real trend.
/// Fixed hysteresis band, not configurable per call.
pub const TREND_THRESHOLD: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Up,
    Down,
    Stable,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Trend {
    pub direction: TrendDirection,
    pub percentage: f64,
}

impl Trend {
    pub const STABLE: Trend = Trend {
        direction: TrendDirection::Stable,
        percentage: 0.0,
    };
}

/// Compare a current value against a reference value.
///
/// A zero or absent reference yields a stable trend rather than a division
/// by zero.
pub fn trend(current: f64, previous: f64) -> Trend {
    if previous == 0.0 || !previous.is_finite() || !current.is_finite() {
        return Trend::STABLE;
    }

    let percentage = (current - previous) / previous * 100.0;
    let direction = if percentage > TREND_THRESHOLD {
        TrendDirection::Up
    } else if percentage < -TREND_THRESHOLD {
        TrendDirection::Down
    } else {
        TrendDirection::Stable
    };

    Trend {
        direction,
        percentage,
    }
}
