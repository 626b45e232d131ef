//! Lenient numeric deserializers for indexer payloads, which mix JSON
//! numbers, numeric strings and nulls for the same field.

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    Text(String),
}

pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<NumberOrString>::deserialize(deserializer)?;
    Ok(match value {
        Some(NumberOrString::Number(n)) => Some(n),
        Some(NumberOrString::Text(s)) => s.trim().parse().ok(),
        None => None,
    })
}

pub fn opt_u8<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = opt_f64(deserializer)?;
    Ok(value.and_then(|n| {
        if n.fract() == 0.0 && (0.0..=u8::MAX as f64).contains(&n) {
            Some(n as u8)
        } else {
            None
        }
    }))
}
