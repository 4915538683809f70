//! Conversion between plain JSON and Firestore's typed value encoding
//! (`{"stringValue": "..."}`, `{"integerValue": "42"}`, ...).

use serde_json::{json, Map, Number, Value};

use crate::store::Fields;

/// Encode a JSON value as a Firestore `Value`
pub fn encode(value: &Value) -> Value {
    match value {
        Value::Null => json!({ "nullValue": null }),
        Value::Bool(b) => json!({ "booleanValue": b }),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({ "integerValue": i.to_string() })
            } else if let Some(u) = n.as_u64() {
                json!({ "integerValue": u.to_string() })
            } else {
                json!({ "doubleValue": n.as_f64() })
            }
        }
        Value::String(s) => json!({ "stringValue": s }),
        Value::Array(items) => {
            let values: Vec<Value> = items.iter().map(encode).collect();
            json!({ "arrayValue": { "values": values } })
        }
        Value::Object(map) => json!({ "mapValue": { "fields": encode_fields(map) } }),
    }
}

pub fn encode_fields(fields: &Fields) -> Value {
    let encoded: Map<String, Value> = fields
        .iter()
        .map(|(k, v)| (k.clone(), encode(v)))
        .collect();
    Value::Object(encoded)
}

/// Decode a Firestore `Value` into plain JSON.
///
/// Timestamps, references and bytes become strings; geo points become
/// `{"lat", "lng"}` maps. Non-finite doubles become `null`.
pub fn decode(value: &Value) -> Result<Value, String> {
    let Some(object) = value.as_object() else {
        return Err(format!("expected a typed value, got {}", value));
    };
    let Some((kind, inner)) = object.iter().next() else {
        return Err("empty typed value".to_string());
    };

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" => inner
            .as_bool()
            .map(Value::Bool)
            .ok_or_else(|| format!("bad booleanValue {}", inner)),
        "integerValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<i64>().ok(),
                other => other.as_i64(),
            };
            parsed
                .map(Value::from)
                .ok_or_else(|| format!("bad integerValue {}", inner))
        }
        "doubleValue" => {
            let parsed = match inner {
                Value::String(s) => s.parse::<f64>().ok(),
                other => other.as_f64(),
            };
            match parsed {
                Some(f) => Ok(Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null)),
                None => Err(format!("bad doubleValue {}", inner)),
            }
        }
        "timestampValue" | "stringValue" | "referenceValue" | "bytesValue" => inner
            .as_str()
            .map(|s| Value::String(s.to_string()))
            .ok_or_else(|| format!("bad {} {}", kind, inner)),
        "geoPointValue" => {
            let lat = inner.get("latitude").and_then(Value::as_f64).unwrap_or(0.0);
            let lng = inner.get("longitude").and_then(Value::as_f64).unwrap_or(0.0);
            Ok(json!({ "lat": lat, "lng": lng }))
        }
        "arrayValue" => {
            let items = inner
                .get("values")
                .and_then(Value::as_array)
                .map(|values| values.iter().map(decode).collect::<Result<Vec<_>, _>>())
                .transpose()?
                .unwrap_or_default();
            Ok(Value::Array(items))
        }
        "mapValue" => {
            let fields = inner
                .get("fields")
                .map(decode_fields)
                .transpose()?
                .unwrap_or_default();
            Ok(Value::Object(fields))
        }
        other => Err(format!("unsupported value type {}", other)),
    }
}

pub fn decode_fields(fields: &Value) -> Result<Fields, String> {
    let Some(map) = fields.as_object() else {
        return Err("fields is not an object".to_string());
    };

    map.iter()
        .map(|(k, v)| decode(v).map(|decoded| (k.clone(), decoded)))
        .collect()
}
