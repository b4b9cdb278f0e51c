use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

/// Accepts a JSON number or a numeric string, mirroring how the dashboard
/// submits form values.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

/// Deserializes `currentMileage`-style fields sent as either a number or a
/// numeric string.
pub fn coerce_i64<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) if n.fract() == 0.0 => Ok(n as i64),
        NumberOrString::Number(_) => Err(serde::de::Error::custom("expected an integer")),
        NumberOrString::String(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| serde::de::Error::custom("expected an integer")),
    }
}

/// Deserializes optional money fields: absent, `null`, and blank strings all
/// become `None`; numbers and numeric strings become `Some`.
pub fn coerce_optional_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<NumberOrString> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(NumberOrString::Number(n)) => Ok(Some(n)),
        Some(NumberOrString::String(s)) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| serde::de::Error::custom("expected a number"))
        }
    }
}

/// Deserializes optional `YYYY-MM-DD` fields where the frontend sends an
/// empty string to mean "not provided".
pub fn optional_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    match value {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| serde::de::Error::custom("must be a valid date (YYYY-MM-DD)")),
    }
}
