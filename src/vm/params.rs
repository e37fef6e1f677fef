use crate::normalize::float_lanes_to_bytes;
use crate::values::{ParamSet, SqlValue};

/// Convert a single unified value to an engine value.
#[must_use]
pub(crate) fn to_engine_value(value: &SqlValue) -> turso::Value {
    match value {
        SqlValue::Int(i) => turso::Value::Integer(*i),
        SqlValue::Float(f) => turso::Value::Real(*f),
        SqlValue::Text(s) => turso::Value::Text(s.clone()),
        SqlValue::Bool(b) => turso::Value::Integer(i64::from(*b)),
        // TEXT keeps chronological sorts lexicographic across both engines.
        SqlValue::Timestamp(dt) => turso::Value::Text(dt.format("%F %T%.f").to_string()),
        SqlValue::Null => turso::Value::Null,
        SqlValue::Json(j) => turso::Value::Text(j.to_string()),
        SqlValue::Blob(bytes) => turso::Value::Blob(bytes.clone()),
        SqlValue::FloatVec(lanes) => turso::Value::Blob(float_lanes_to_bytes(lanes)),
    }
}

/// Convert a unified parameter set to the engine's container. The empty set
/// becomes an empty positional bind, the zero-argument execute form.
#[must_use]
pub(crate) fn to_engine_params(set: &ParamSet) -> turso::params::Params {
    match set {
        ParamSet::Empty => turso::params::Params::Positional(Vec::new()),
        ParamSet::Positional(values) => {
            turso::params::Params::Positional(values.iter().map(to_engine_value).collect())
        }
        ParamSet::Named(pairs) => turso::params::Params::Named(
            pairs
                .iter()
                .map(|(name, value)| (name.clone(), to_engine_value(value)))
                .collect(),
        ),
    }
}
