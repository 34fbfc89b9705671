//! Human-readable display formatting.
//!
//! Every formatter is a total function: NaN, negative, or absent input
//! degrades to the canonical zero display instead of failing. Zero itself is
//! a valid, displayable value; absence is expressed with `Option` where the
//! two must be told apart.

/// Currency suffix used when the configuration does not override it.
pub const DEFAULT_CURRENCY: &str = "€";

/// Format a duration in seconds, e.g. `2h 30m` or `1m 15s`.
///
/// Units decompose by integer division, zero-valued leading units are
/// omitted, and the seconds component is suppressed in compact mode or as
/// soon as hours are present.
pub fn duration(seconds: f64, compact: bool) -> String {
    if !(seconds > 0.0) {
        return "0s".to_string();
    }

    let total = seconds as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    let mut parts = Vec::new();
    if hours > 0 {
        parts.push(format!("{hours}h"));
    }
    if minutes > 0 {
        parts.push(format!("{minutes}m"));
    }
    if !compact && secs > 0 && hours == 0 {
        parts.push(format!("{secs}s"));
    }

    if parts.is_empty() {
        "0s".to_string()
    } else {
        parts.join(" ")
    }
}

/// Format an energy reading in kWh, switching to whole Wh below 1 kWh.
pub fn energy(kwh: f64, decimals: usize) -> String {
    if !(kwh > 0.0) {
        return "0 kWh".to_string();
    }

    if kwh < 1.0 {
        format!("{} Wh", (kwh * 1000.0).round() as i64)
    } else {
        format!("{kwh:.decimals$} kWh")
    }
}

/// Format a power reading in watts, switching to kW at 1000 W.
pub fn power(watts: f64, decimals: usize) -> String {
    if !(watts > 0.0) {
        return "0 W".to_string();
    }

    if watts >= 1000.0 {
        format!("{:.1} kW", watts / 1000.0)
    } else {
        format!("{watts:.decimals$} W")
    }
}

/// Format a monetary value with a trailing currency suffix.
pub fn cost(value: f64, currency: &str, decimals: usize) -> String {
    if !(value > 0.0) {
        return format!("{:.decimals$} {currency}", 0.0);
    }

    format!("{value:.decimals$} {currency}")
}

/// Format a percentage rounded to the nearest integer, with a leading `+`
/// for positive values when requested. Absent input renders as `0%`.
pub fn percent(value: Option<f64>, include_sign: bool) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return "0%".to_string();
    };

    let sign = if include_sign && v > 0.0 { "+" } else { "" };
    format!("{sign}{}%", v.round() as i64)
}

/// Format a number with thousands grouping and a fixed number of decimals.
pub fn number(value: Option<f64>, decimals: usize) -> String {
    let Some(v) = value.filter(|v| v.is_finite()) else {
        return "0".to_string();
    };

    group_thousands(&format!("{v:.decimals$}"))
}

/// Insert `,` separators into the integer part of an already fixed-point
/// formatted number.
fn group_thousands(fixed: &str) -> String {
    let (sign, rest) = match fixed.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", fixed),
    };
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (rest, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_zero_and_negative() {
        assert_eq!(duration(0.0, false), "0s");
        assert_eq!(duration(-5.0, false), "0s");
        assert_eq!(duration(f64::NAN, false), "0s");
    }

    #[test]
    fn test_duration_components() {
        assert_eq!(duration(59.0, false), "59s");
        assert_eq!(duration(61.0, false), "1m 1s");
        assert_eq!(duration(61.0, true), "1m");
        // Seconds suppressed once hours are present
        assert_eq!(duration(3661.0, false), "1h 1m");
        assert_eq!(duration(3600.0, false), "1h");
        assert_eq!(duration(9000.0, false), "2h 30m");
        // Sub-minute compact durations have no renderable component
        assert_eq!(duration(45.0, true), "0s");
    }

    #[test]
    fn test_energy() {
        assert_eq!(energy(0.5, 2), "500 Wh");
        assert_eq!(energy(1.256, 2), "1.26 kWh");
        assert_eq!(energy(-1.0, 2), "0 kWh");
        assert_eq!(energy(0.0, 2), "0 kWh");
        assert_eq!(energy(0.9996, 2), "1000 Wh");
        assert_eq!(energy(12.0, 1), "12.0 kWh");
    }

    #[test]
    fn test_power() {
        assert_eq!(power(0.0, 0), "0 W");
        assert_eq!(power(-3.0, 0), "0 W");
        assert_eq!(power(500.0, 0), "500 W");
        assert_eq!(power(999.9, 1), "999.9 W");
        assert_eq!(power(1500.0, 0), "1.5 kW");
    }

    #[test]
    fn test_cost() {
        assert_eq!(cost(0.0, "€", 2), "0.00 €");
        assert_eq!(cost(3.1, "€", 2), "3.10 €");
        assert_eq!(cost(-2.0, "€", 2), "0.00 €");
        assert_eq!(cost(1.499, "$", 2), "1.50 $");
    }

    #[test]
    fn test_percent() {
        assert_eq!(percent(None, true), "0%");
        assert_eq!(percent(Some(f64::NAN), true), "0%");
        assert_eq!(percent(Some(0.0), true), "0%");
        assert_eq!(percent(Some(20.0), true), "+20%");
        assert_eq!(percent(Some(20.0), false), "20%");
        assert_eq!(percent(Some(-15.4), true), "-15%");
        // Sign tracks the raw value, rounding happens after
        assert_eq!(percent(Some(0.3), true), "+0%");
    }

    #[test]
    fn test_number() {
        assert_eq!(number(None, 0), "0");
        assert_eq!(number(Some(0.0), 0), "0");
        assert_eq!(number(Some(7.0), 0), "7");
        assert_eq!(number(Some(1234567.0), 0), "1,234,567");
        assert_eq!(number(Some(1234.5), 1), "1,234.5");
        assert_eq!(number(Some(-1234.0), 0), "-1,234");
        assert_eq!(number(Some(999.0), 0), "999");
    }
}
