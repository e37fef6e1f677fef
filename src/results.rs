use std::collections::HashMap;
use std::sync::Arc;

use crate::values::SqlValue;

/// One materialized result row.
///
/// Column names and the name-to-index cache are shared across every row of a
/// result set instead of being duplicated per row.
#[derive(Debug, Clone)]
pub struct Row {
    column_names: Arc<Vec<String>>,
    index_cache: Arc<HashMap<String, usize>>,
    values: Vec<SqlValue>,
}

impl Row {
    /// Get a value by column name, or None if the column wasn't selected.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        if let Some(&idx) = self.index_cache.get(column) {
            return self.values.get(idx);
        }
        // Fall back to linear search
        self.column_names
            .iter()
            .position(|name| name == column)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value by column position, or None if out of bounds.
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&SqlValue> {
        self.values.get(index)
    }

    #[must_use]
    pub fn column_names(&self) -> &[String] {
        &self.column_names
    }

    #[must_use]
    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    #[must_use]
    pub fn into_values(self) -> Vec<SqlValue> {
        self.values
    }
}

/// A fully materialized execution result.
#[derive(Debug, Clone, Default)]
pub struct RowSet {
    /// The rows returned by the query, in cursor order.
    pub rows: Vec<Row>,
    /// The number of rows affected (for DML statements)
    pub rows_affected: usize,
    column_names: Option<Arc<Vec<String>>>,
    index_cache: Option<Arc<HashMap<String, usize>>>,
}

impl RowSet {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> RowSet {
        RowSet {
            rows: Vec::with_capacity(capacity),
            rows_affected: 0,
            column_names: None,
            index_cache: None,
        }
    }

    /// Set the column names shared by all rows; the lookup cache is built
    /// once here and reused by every row.
    pub fn set_column_names(&mut self, column_names: Arc<Vec<String>>) {
        let cache = Arc::new(
            column_names
                .iter()
                .enumerate()
                .map(|(idx, name)| (name.clone(), idx))
                .collect::<HashMap<_, _>>(),
        );
        self.index_cache = Some(cache);
        self.column_names = Some(column_names);
    }

    #[must_use]
    pub fn get_column_names(&self) -> Option<&Arc<Vec<String>>> {
        self.column_names.as_ref()
    }

    /// Append one row's values; a no-op until column names have been set.
    pub fn add_row_values(&mut self, values: Vec<SqlValue>) {
        let (Some(column_names), Some(index_cache)) = (&self.column_names, &self.index_cache)
        else {
            return;
        };
        self.rows.push(Row {
            column_names: Arc::clone(column_names),
            index_cache: Arc::clone(index_cache),
            values,
        });
        self.rows_affected += 1;
    }

    /// Detach the first row, if any.
    #[must_use]
    pub fn into_first_row(self) -> Option<Row> {
        self.rows.into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RowSet {
        let mut set = RowSet::with_capacity(2);
        set.set_column_names(Arc::new(vec!["a".to_owned(), "b".to_owned()]));
        set.add_row_values(vec![SqlValue::Int(1), SqlValue::Text("x".into())]);
        set.add_row_values(vec![SqlValue::Int(2), SqlValue::Text("y".into())]);
        set
    }

    #[test]
    fn lookup_by_name_and_index_agree() {
        let set = sample();
        let row = &set.rows[0];
        assert_eq!(row.get("a"), row.get_by_index(0));
        assert_eq!(row.get("b").and_then(SqlValue::as_text), Some("x"));
        assert!(row.get("missing").is_none());
    }

    #[test]
    fn rows_without_columns_are_dropped() {
        let mut set = RowSet::with_capacity(1);
        set.add_row_values(vec![SqlValue::Int(1)]);
        assert!(set.rows.is_empty());
        assert_eq!(set.rows_affected, 0);
    }
}
