use crate::values::{ParamSet, SqlValue};

/// Serialize vector lanes in order as little-endian f32 bytes, the layout
/// sqlite-vec expects for `vec_f32` blobs.
#[must_use]
pub(crate) fn float_lanes_to_bytes(lanes: &[f32]) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(lanes.len() * 4);
    for lane in lanes {
        bytes.extend_from_slice(&lane.to_le_bytes());
    }
    bytes
}

/// Produce the bindable form of one value.
///
/// Scalars pass through untouched; vector payloads become their blob
/// representation. The caller's value is never mutated.
#[must_use]
pub fn normalize_value(value: &SqlValue) -> SqlValue {
    match value {
        SqlValue::FloatVec(lanes) => SqlValue::Blob(float_lanes_to_bytes(lanes)),
        other => other.clone(),
    }
}

/// Produce a derived, bindable copy of a full parameter set.
///
/// Positional sets are mapped elementwise in order; named sets keep their
/// keys (qualified with a `:` sigil when the caller omitted one).
#[must_use]
pub fn normalize_params(params: &ParamSet) -> ParamSet {
    match params {
        ParamSet::Empty => ParamSet::Empty,
        ParamSet::Positional(values) => {
            ParamSet::Positional(values.iter().map(normalize_value).collect())
        }
        ParamSet::Named(pairs) => ParamSet::Named(
            pairs
                .iter()
                .map(|(name, value)| (qualify_name(name), normalize_value(value)))
                .collect(),
        ),
    }
}

/// Convert an ordered sequence into a 1-based `?N`-keyed mapping, usable by
/// binding calls that take named-style arguments. `?N` is the name SQLite
/// itself assigns to numbered slots.
#[must_use]
pub fn to_positional_param_object(values: &[SqlValue]) -> Vec<(String, SqlValue)> {
    values
        .iter()
        .enumerate()
        .map(|(idx, value)| (format!("?{}", idx + 1), normalize_value(value)))
        .collect()
}

pub(crate) fn qualify_name(name: &str) -> String {
    if name.starts_with([':', '@', '$', '?']) {
        name.to_owned()
    } else {
        format!(":{name}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blobs_round_trip_byte_for_byte() {
        for len in [0usize, 1, 3, 1024] {
            let payload: Vec<u8> = (0..len).map(|i| (i % 251) as u8).collect();
            let normalized = normalize_value(&SqlValue::Blob(payload.clone()));
            assert_eq!(normalized.as_blob(), Some(payload.as_slice()));
        }
    }

    #[test]
    fn float_lanes_serialize_little_endian_in_order() {
        let normalized = normalize_value(&SqlValue::FloatVec(vec![1.0, -2.5]));
        let expected: Vec<u8> = 1.0f32
            .to_le_bytes()
            .into_iter()
            .chain((-2.5f32).to_le_bytes())
            .collect();
        assert_eq!(normalized.as_blob(), Some(expected.as_slice()));
    }

    #[test]
    fn scalars_pass_through_unchanged() {
        for value in [
            SqlValue::Int(7),
            SqlValue::Float(0.5),
            SqlValue::Text("x".into()),
            SqlValue::Bool(true),
            SqlValue::Null,
        ] {
            assert_eq!(normalize_value(&value), value);
        }
    }

    #[test]
    fn named_sets_keep_keys_and_gain_sigils() {
        let set = ParamSet::named(vec![("a", SqlValue::Int(1)), (":b", SqlValue::Int(2))]);
        let ParamSet::Named(pairs) = normalize_params(&set) else {
            panic!("expected a named set");
        };
        assert_eq!(pairs[0].0, ":a");
        assert_eq!(pairs[1].0, ":b");
    }

    #[test]
    fn positional_normalization_preserves_order_and_source() {
        let source = ParamSet::positional(vec![
            SqlValue::Int(1),
            SqlValue::FloatVec(vec![0.0]),
            SqlValue::Int(3),
        ]);
        let before = source.clone();
        let ParamSet::Positional(values) = normalize_params(&source) else {
            panic!("expected a positional set");
        };
        assert_eq!(values[0], SqlValue::Int(1));
        assert!(matches!(values[1], SqlValue::Blob(_)));
        assert_eq!(values[2], SqlValue::Int(3));
        // The caller's set is a pristine copy, vector payload included.
        assert_eq!(source, before);
    }

    #[test]
    fn positional_object_keys_are_one_based_slot_names() {
        let pairs = to_positional_param_object(&[SqlValue::Int(10), SqlValue::Int(20)]);
        assert_eq!(pairs[0].0, "?1");
        assert_eq!(pairs[1].0, "?2");
        assert_eq!(pairs[1].1, SqlValue::Int(20));
    }
}
