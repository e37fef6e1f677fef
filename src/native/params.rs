use crate::normalize::float_lanes_to_bytes;
use crate::values::{ParamSet, SqlValue};

/// Convert a single unified value to an engine value.
#[must_use]
pub(crate) fn to_engine_value(value: &SqlValue) -> rusqlite::types::Value {
    match value {
        SqlValue::Int(i) => rusqlite::types::Value::Integer(*i),
        SqlValue::Float(f) => rusqlite::types::Value::Real(*f),
        SqlValue::Text(s) => rusqlite::types::Value::Text(s.clone()),
        SqlValue::Bool(b) => rusqlite::types::Value::Integer(i64::from(*b)),
        // TEXT keeps chronological sorts lexicographic across both engines.
        SqlValue::Timestamp(dt) => {
            rusqlite::types::Value::Text(dt.format("%F %T%.f").to_string())
        }
        SqlValue::Null => rusqlite::types::Value::Null,
        SqlValue::Json(j) => rusqlite::types::Value::Text(j.to_string()),
        SqlValue::Blob(bytes) => rusqlite::types::Value::Blob(bytes.clone()),
        SqlValue::FloatVec(lanes) => rusqlite::types::Value::Blob(float_lanes_to_bytes(lanes)),
    }
}

/// Engine-native parameter container for the call-based backend.
pub(crate) enum NativeParams {
    None,
    Positional(Vec<rusqlite::types::Value>),
    Named(Vec<(String, rusqlite::types::Value)>),
}

impl NativeParams {
    pub(crate) fn from_set(set: &ParamSet) -> Self {
        match set {
            ParamSet::Empty => NativeParams::None,
            ParamSet::Positional(values) => {
                NativeParams::Positional(values.iter().map(to_engine_value).collect())
            }
            ParamSet::Named(pairs) => NativeParams::Named(
                pairs
                    .iter()
                    .map(|(name, value)| (name.clone(), to_engine_value(value)))
                    .collect(),
            ),
        }
    }
}
