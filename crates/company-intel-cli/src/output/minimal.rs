use serde_json::Value;

use super::{format_scalar, result_of};

/// Headline figure of each analysis, in priority order.
const HEADLINE_KEYS: [&str; 7] = [
    "average_score",
    "high_risk_count",
    "total_counties",
    "total_analyzed",
    "total_companies",
    "companies",
    "records",
];

/// Print just the headline value of the output, as `key: value`.
pub fn print_minimal(value: &Value) {
    println!("{}", headline(value));
}

fn headline(value: &Value) -> String {
    let result = result_of(value);

    let Value::Object(map) = result else {
        return format_scalar(result);
    };

    // Full report: one headline per section
    if map.contains_key("trends") && map.contains_key("fraud") {
        return map
            .iter()
            .filter(|(_, v)| v.is_object())
            .map(|(section, v)| format!("{section}.{}", headline(v)))
            .collect::<Vec<_>>()
            .join("\n");
    }

    HEADLINE_KEYS
        .iter()
        .find_map(|key| match map.get(*key) {
            Some(val) if !val.is_null() && !val.is_array() => {
                Some(format!("{key}: {}", format_scalar(val)))
            }
            _ => None,
        })
        .or_else(|| {
            map.iter()
                .next()
                .map(|(key, val)| format!("{key}: {}", format_scalar(val)))
        })
        .unwrap_or_default()
}
