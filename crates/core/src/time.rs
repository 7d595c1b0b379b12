use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// A timestamp exactly as the trace source sent it.
///
/// Parsing happens on read so malformed values survive a round trip and only
/// degrade the arithmetic that touches them (see [`Timestamp::millis`]).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Option<Value>", into = "Value")]
pub struct Timestamp(Option<Value>);

impl Timestamp {
    pub fn parse(&self) -> Option<DateTime<Utc>> {
        match self.0.as_ref()? {
            Value::String(s) => parse_timestamp(s),
            Value::Number(n) => n
                .as_f64()
                .filter(|ms| ms.is_finite())
                .and_then(|ms| DateTime::from_timestamp_micros((ms * 1000.0) as i64)),
            _ => None,
        }
    }

    /// Milliseconds since the epoch, `NaN` when the value cannot be parsed.
    pub fn millis(&self) -> f64 {
        self.parse()
            .map(|ts| ts.timestamp_micros() as f64 / 1000.0)
            .unwrap_or(f64::NAN)
    }

    pub fn display(&self) -> String {
        match &self.0 {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "-".to_string(),
        }
    }
}

impl From<Option<Value>> for Timestamp {
    fn from(value: Option<Value>) -> Self {
        Self(value.filter(|v| !v.is_null()))
    }
}

impl From<Timestamp> for Value {
    fn from(value: Timestamp) -> Self {
        value.0.unwrap_or(Value::Null)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(value: DateTime<Utc>) -> Self {
        Self(Some(Value::String(value.to_rfc3339())))
    }
}

impl From<&str> for Timestamp {
    fn from(value: &str) -> Self {
        Self(Some(Value::String(value.to_string())))
    }
}

/// Parses RFC 3339 or an offset-less ISO 8601 timestamp, the latter read as UTC.
pub fn parse_timestamp(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(input) {
        return Some(ts.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .map(|naive| naive.and_utc())
}

/// Span of time between two timestamps in milliseconds; `NaN` if either side is unparseable.
pub fn elapsed_ms(start: &Timestamp, end: &Timestamp) -> f64 {
    end.millis() - start.millis()
}

pub fn format_short_duration(ms: f64) -> String {
    if ms >= 1000.0 {
        format!("{:.1}s", ms / 1000.0)
    } else {
        format!("{}ms", ms.round())
    }
}
