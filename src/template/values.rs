//! Serialization-time value transformation.
//!
//! Supplied value data is rebuilt recursively. Objects carrying an intrinsic
//! key (`Ref`, `Condition`, `Fn::*`) are already in target form and pass
//! through untouched; everything else is reconstructed with `null` members
//! (unset optional fields) dropped.

use serde_json::{Map, Value};

use crate::project::ReservedNames;

pub fn transform_value(value: &Value, reserved: &ReservedNames) -> Value {
    match value {
        Value::Object(map) if is_intrinsic(map, reserved) => value.clone(),
        Value::Object(map) => Value::Object(transform_object(map, reserved)),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| transform_value(item, reserved))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}

pub fn transform_object(map: &Map<String, Value>, reserved: &ReservedNames) -> Map<String, Value> {
    map.iter()
        .filter(|(_, v)| !v.is_null())
        .map(|(k, v)| (k.clone(), transform_value(v, reserved)))
        .collect()
}

/// A map already holding an intrinsic-function representation.
pub fn is_intrinsic(map: &Map<String, Value>, reserved: &ReservedNames) -> bool {
    map.keys().any(|key| reserved.is_intrinsic_key(key))
}
