//! Property conversion: store-native values → JSON-safe values
//!
//! Temporal values are rendered as ISO-8601 strings, containers are converted
//! element-wise and everything else passes through untouched. The conversion
//! is idempotent since its output never contains a temporal value.

use super::models::{PropertyMap, PropertyValue};

/// Convert a single value
pub fn convert_value(value: PropertyValue) -> PropertyValue {
    match value {
        PropertyValue::List(items) => {
            PropertyValue::List(items.into_iter().map(convert_value).collect())
        }
        PropertyValue::Map(map) => PropertyValue::Map(convert_properties(map)),
        temporal if temporal.is_temporal() => match to_iso8601(&temporal) {
            Some(iso) => PropertyValue::String(iso),
            None => temporal,
        },
        other => other,
    }
}

/// Convert every value of a property map, preserving keys
pub fn convert_properties(properties: PropertyMap) -> PropertyMap {
    properties
        .into_iter()
        .map(|(key, value)| (key, convert_value(value)))
        .collect()
}

/// ISO-8601 rendering of a temporal value, `None` for anything else
pub fn to_iso8601(value: &PropertyValue) -> Option<String> {
    let iso = match value {
        PropertyValue::Date(date) => date.format("%Y-%m-%d").to_string(),
        PropertyValue::LocalTime(time) => time.format("%H:%M:%S%.f").to_string(),
        PropertyValue::Time { time, offset } => {
            format!("{}{}", time.format("%H:%M:%S%.f"), offset)
        }
        PropertyValue::LocalDateTime(dt) => dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string(),
        PropertyValue::DateTime(dt) => dt.to_rfc3339(),
        PropertyValue::Duration {
            months,
            days,
            seconds,
            nanos,
        } => format_duration(*months, *days, *seconds, *nanos),
        _ => return None,
    };
    Some(iso)
}

/// `PnMnDTnS`, zero date parts omitted, e.g. `P1M2DT-1.5S`
fn format_duration(months: i64, days: i64, seconds: i64, nanos: i64) -> String {
    const NANOS_PER_SEC: i128 = 1_000_000_000;

    let mut iso = String::from("P");
    if months != 0 {
        iso.push_str(&format!("{}M", months));
    }
    if days != 0 {
        iso.push_str(&format!("{}D", days));
    }

    let total = i128::from(seconds) * NANOS_PER_SEC + i128::from(nanos);
    if total != 0 || (months == 0 && days == 0) {
        let sign = if total < 0 { "-" } else { "" };
        let abs = total.unsigned_abs();
        let whole = abs / NANOS_PER_SEC as u128;
        let fraction = abs % NANOS_PER_SEC as u128;
        if fraction == 0 {
            iso.push_str(&format!("T{}{}S", sign, whole));
        } else {
            let fraction = format!("{:09}", fraction);
            iso.push_str(&format!(
                "T{}{}.{}S",
                sign,
                whole,
                fraction.trim_end_matches('0')
            ));
        }
    }
    iso
}
