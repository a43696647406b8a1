// Defensive parsing of provider JSON into RawPoints.
// Dataset: {"point": [{"startTimeNanos": "..", "endTimeNanos": "..", "value": [{"fpVal": 1.0} | {"intVal": 3}]}]}
// Sessions: {"session": [{"startTimeMillis": "..", "endTimeMillis": "..", "activityType": 72}]}
// Epochs arrive as strings or numbers. Missing arrays mean "no points"; points
// without a usable start time are skipped. Only a non-object body is an error.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::error::ProviderError;
use crate::models::{PointValue, RawPoint};

pub fn parse_dataset(body: &Value) -> Result<Vec<RawPoint>, ProviderError> {
    let obj = body
        .as_object()
        .ok_or_else(|| ProviderError::Malformed("dataset body is not an object".into()))?;
    let Some(points) = array_field(obj, "point")? else {
        return Ok(vec![]);
    };

    let mut out = Vec::with_capacity(points.len());
    for (i, p) in points.iter().enumerate() {
        match parse_point(p) {
            Some(point) => out.push(point),
            None => tracing::debug!(index = i, "skipping dataset point without start time"),
        }
    }
    Ok(out)
}

/// Sessions of `activity_type` as span points carrying the activity type as value.
pub fn parse_sessions(body: &Value, activity_type: i64) -> Result<Vec<RawPoint>, ProviderError> {
    let obj = body
        .as_object()
        .ok_or_else(|| ProviderError::Malformed("session body is not an object".into()))?;
    let Some(sessions) = array_field(obj, "session")? else {
        return Ok(vec![]);
    };

    let out = sessions
        .iter()
        .filter_map(Value::as_object)
        .filter(|s| s.get("activityType").and_then(epoch_value) == Some(activity_type))
        .filter_map(|s| {
            let start = epoch_field(s, "startTimeMillis").and_then(DateTime::from_timestamp_millis)?;
            let end = epoch_field(s, "endTimeMillis")
                .and_then(DateTime::from_timestamp_millis)
                .unwrap_or(start);
            Some(RawPoint::span(start, end, vec![PointValue::Int(activity_type)]))
        })
        .collect();
    Ok(out)
}

fn parse_point(p: &Value) -> Option<RawPoint> {
    let obj = p.as_object()?;
    let start = epoch_field(obj, "startTimeNanos").map(from_nanos)?;
    let end = epoch_field(obj, "endTimeNanos")
        .map(from_nanos)
        .unwrap_or(start);
    let values = obj
        .get("value")
        .and_then(Value::as_array)
        .map(|vs| vs.iter().map(parse_value).collect())
        .unwrap_or_default();
    Some(RawPoint::span(start, end, values))
}

fn parse_value(v: &Value) -> PointValue {
    let Some(obj) = v.as_object() else {
        return PointValue::Missing;
    };
    if let Some(f) = obj.get("fpVal").and_then(Value::as_f64) {
        return PointValue::Float(f);
    }
    if let Some(i) = obj.get("intVal").and_then(epoch_value) {
        return PointValue::Int(i);
    }
    PointValue::Missing
}

/// `Ok(None)` for absent or null; error if present but not an array.
fn array_field<'a>(
    obj: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Vec<Value>>, ProviderError> {
    match obj.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(_) => Err(ProviderError::Malformed(format!("`{key}` is not an array"))),
    }
}

fn epoch_field(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    obj.get(key).and_then(epoch_value)
}

fn epoch_value(v: &Value) -> Option<i64> {
    match v {
        Value::String(s) => s.trim().parse().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    }
}

fn from_nanos(nanos: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_nanos(nanos)
}
