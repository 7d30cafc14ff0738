//! Flat JSON rendering of finished spans, one object per span.
//!
//! ```json
//! {"service":"bookexplorer","trace_id":"…","span_id":"…","parent_span_id":"…",
//!  "name":"load_more_books","start_unix_nano":1718000000000000000,"duration_us":412,
//!  "attributes":{"next_page":2},"events":[{"name":"loading next page","attributes":{}}],
//!  "status":"unset"}
//! ```

use opentelemetry::trace::{SpanId, Status};
use opentelemetry::{KeyValue, Value};
use opentelemetry_sdk::export::trace::SpanData;
use serde_json::{json, Map, Value as JsonValue};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Renders `span` as a single JSON object tagged with `service`.
pub fn format_span(service: &str, span: &SpanData) -> JsonValue {
    let parent = if span.parent_span_id == SpanId::INVALID {
        JsonValue::Null
    } else {
        json!(format!("{:016x}", span.parent_span_id))
    };

    let duration = span
        .end_time
        .duration_since(span.start_time)
        .unwrap_or(Duration::ZERO);

    let events: Vec<JsonValue> = span
        .events
        .iter()
        .map(|event| {
            json!({
                "name": event.name,
                "attributes": attributes(&event.attributes),
            })
        })
        .collect();

    json!({
        "service": service,
        "trace_id": format!("{:032x}", span.span_context.trace_id()),
        "span_id": format!("{:016x}", span.span_context.span_id()),
        "parent_span_id": parent,
        "name": span.name,
        "start_unix_nano": unix_nanos(span.start_time),
        "duration_us": u64::try_from(duration.as_micros()).unwrap_or(u64::MAX),
        "attributes": attributes(&span.attributes),
        "events": events,
        "status": status(&span.status),
    })
}

fn attributes(kvs: &[KeyValue]) -> JsonValue {
    let map: Map<String, JsonValue> = kvs
        .iter()
        .map(|kv| (kv.key.to_string(), value(&kv.value)))
        .collect();
    JsonValue::Object(map)
}

fn value(v: &Value) -> JsonValue {
    match v {
        Value::Bool(b) => json!(b),
        Value::I64(i) => json!(i),
        Value::F64(f) => json!(f),
        Value::String(s) => json!(s.as_str()),
        Value::Array(_) => json!(v.to_string()),
    }
}

fn status(status: &Status) -> JsonValue {
    match status {
        Status::Unset => json!("unset"),
        Status::Ok => json!("ok"),
        Status::Error { description } => json!({ "error": description.to_string() }),
    }
}

fn unix_nanos(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map_or(0, |d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
}
