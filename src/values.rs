use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

/// Values bound to statement parameters or read back from result rows.
///
/// Both execution engines share this enum so caller code never branches on
/// driver types:
/// ```rust
/// use sqlite_vec_unified::prelude::*;
///
/// let params = ParamSet::positional(vec![
///     SqlValue::Int(1),
///     SqlValue::Text("alice".into()),
///     SqlValue::FloatVec(vec![0.1, 0.2, 0.3]),
/// ]);
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    Json(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
    /// Typed vector payload (e.g. an embedding); serialized to a
    /// little-endian f32 blob before binding.
    FloatVec(Vec<f32>),
}

impl SqlValue {
    /// Copy the addressed byte range of a borrowed view into an owned blob.
    #[must_use]
    pub fn blob_from(bytes: &[u8]) -> Self {
        SqlValue::Blob(bytes.to_vec())
    }

    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let SqlValue::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let SqlValue::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let SqlValue::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let SqlValue::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            // Try "YYYY-MM-DD HH:MM:SS"
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            // Try "YYYY-MM-DD HH:MM:SS.SSS"
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S.%3f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        if let SqlValue::Float(value) = self {
            Some(*value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let SqlValue::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_float_vec(&self) -> Option<&[f32]> {
        if let SqlValue::FloatVec(lanes) = self {
            Some(lanes)
        } else {
            None
        }
    }
}

/// The parameter values a caller hands to `bind`/`run`/`get`/`all`.
///
/// Positional sets bind by slot order; named sets bind by parameter name.
/// Names may be given with or without their sigil; a missing sigil is
/// qualified with `:` at bind time.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ParamSet {
    /// No parameters.
    #[default]
    Empty,
    /// Ordered values for `?`/`?N` placeholders.
    Positional(Vec<SqlValue>),
    /// Name/value pairs for `:name`, `@name`, or `$name` placeholders.
    Named(Vec<(String, SqlValue)>),
}

impl ParamSet {
    #[must_use]
    pub fn positional(values: Vec<SqlValue>) -> Self {
        ParamSet::Positional(values)
    }

    #[must_use]
    pub fn named<K: Into<String>>(pairs: Vec<(K, SqlValue)>) -> Self {
        ParamSet::Named(pairs.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            ParamSet::Empty => true,
            ParamSet::Positional(values) => values.is_empty(),
            ParamSet::Named(pairs) => pairs.is_empty(),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ParamSet::Empty => 0,
            ParamSet::Positional(values) => values.len(),
            ParamSet::Named(pairs) => pairs.len(),
        }
    }
}

impl From<Vec<SqlValue>> for ParamSet {
    fn from(values: Vec<SqlValue>) -> Self {
        ParamSet::Positional(values)
    }
}

impl From<&[SqlValue]> for ParamSet {
    fn from(values: &[SqlValue]) -> Self {
        ParamSet::Positional(values.to_vec())
    }
}
