//! Snapshot correlation across the three monitoring endpoints.
//!
//! The three endpoints describe the same broker instance at slightly
//! different response times. The `/varz` payload acts as the anchor:
//! its `port` and `now` are stamped onto the subscription record and
//! every route record, making all records from one cycle join-able
//! downstream without a separate correlation key.
//!
//! Correlation is a pure function from the three raw payloads to new
//! record values; the parsed inputs are never mutated in place after
//! this step.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::CollectorError;

/// Required anchor fields of the `/varz` payload.
#[derive(Debug, Deserialize)]
struct Anchor {
    port: u16,
    now: Value,
}

/// All records from one cycle, cross-stamped with the anchor's
/// `port` and `now`.
#[derive(Debug, Clone)]
pub struct CorrelatedCycle {
    /// The anchor record itself, as returned by `/varz`.
    pub varz: Map<String, Value>,
    /// Subscription stats with `now` and `port` injected.
    pub subsz: Map<String, Value>,
    /// One record per route. Each carries its original listening port
    /// under `remote_port`, the anchor's `port`, and the anchor's `now`.
    pub routes: Vec<Map<String, Value>>,
    /// The anchor's port, identifying the broker instance.
    pub port: u16,
}

/// Correlate one cycle's raw payloads.
///
/// Fails with [`CollectorError::Parse`] if any payload is not a JSON
/// object, if `varz` lacks an integer `port` or a `now` field, or if a
/// `routes` entry is not an object. An empty or absent `routes` list
/// yields zero route records and is not an error.
pub fn correlate(
    varz_bytes: &[u8],
    subsz_bytes: &[u8],
    routez_bytes: &[u8],
) -> Result<CorrelatedCycle, CollectorError> {
    let varz = parse_object(varz_bytes, "varz")?;
    let anchor: Anchor = serde_json::from_slice(varz_bytes)
        .map_err(|e| CollectorError::Parse(format!("varz anchor fields: {}", e)))?;

    let mut subsz = parse_object(subsz_bytes, "subsz")?;
    subsz.insert("now".to_string(), anchor.now.clone());
    subsz.insert("port".to_string(), Value::from(anchor.port));

    let routez = parse_object(routez_bytes, "routez")?;
    let routes = correlate_routes(&routez, &anchor)?;

    Ok(CorrelatedCycle {
        varz,
        subsz,
        routes,
        port: anchor.port,
    })
}

fn correlate_routes(
    routez: &Map<String, Value>,
    anchor: &Anchor,
) -> Result<Vec<Map<String, Value>>, CollectorError> {
    let entries = match routez.get("routes") {
        Some(Value::Array(entries)) => entries,
        Some(other) => {
            return Err(CollectorError::Parse(format!(
                "routez `routes` is not a list (got {})",
                json_type(other)
            )))
        }
        None => return Ok(Vec::new()),
    };

    entries
        .iter()
        .map(|entry| {
            let mut route = entry
                .as_object()
                .ok_or_else(|| {
                    CollectorError::Parse(format!(
                        "routez entry is not an object (got {})",
                        json_type(entry)
                    ))
                })?
                .clone();

            // Preserve the route's own listening port under remote_port,
            // then overwrite port with the anchor's so every record from
            // this cycle shares the broker instance id.
            if let Some(own_port) = route.get("port").cloned() {
                route.insert("remote_port".to_string(), own_port);
            }
            route.insert("port".to_string(), Value::from(anchor.port));
            route.insert("now".to_string(), anchor.now.clone());

            Ok(route)
        })
        .collect()
}

fn parse_object(bytes: &[u8], endpoint: &str) -> Result<Map<String, Value>, CollectorError> {
    let value: Value = serde_json::from_slice(bytes)
        .map_err(|e| CollectorError::Parse(format!("{}: {}", endpoint, e)))?;
    match value {
        Value::Object(map) => Ok(map),
        other => Err(CollectorError::Parse(format!(
            "{} payload is not an object (got {})",
            endpoint,
            json_type(&other)
        ))),
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
