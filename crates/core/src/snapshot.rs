//! Snapshot of the asset table: an insertion-ordered mapping from asset_id to
//! a field map.
//!
//! Captured once before an edit session begins and used only as the diff
//! baseline; discarded after reconciliation. Row order is preserved so that
//! the reconciler's output follows the order the user saw in the edit grid.

use std::collections::HashMap;

use crate::error::CoreError;

/// Stringified field values for one asset row, keyed by column name.
pub type FieldMap = HashMap<String, String>;

/// An ordered asset_id -> field-map table.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    order: Vec<String>,
    rows: HashMap<String, FieldMap>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a snapshot from `(asset_id, fields)` pairs, preserving order.
    ///
    /// Asset ids are trimmed; an empty id or a duplicate id is a validation
    /// error (asset_id is unique and immutable).
    pub fn from_rows<I>(rows: I) -> Result<Self, CoreError>
    where
        I: IntoIterator<Item = (String, FieldMap)>,
    {
        let mut snapshot = Self::new();
        for (asset_id, fields) in rows {
            snapshot.insert(asset_id, fields)?;
        }
        Ok(snapshot)
    }

    /// Insert one row, enforcing the asset_id invariant.
    pub fn insert(&mut self, asset_id: String, fields: FieldMap) -> Result<(), CoreError> {
        let asset_id = asset_id.trim().to_string();
        if asset_id.is_empty() {
            return Err(CoreError::Validation(
                "asset_id must be non-empty".to_string(),
            ));
        }
        if self.rows.contains_key(&asset_id) {
            return Err(CoreError::Validation(format!(
                "Duplicate asset_id '{asset_id}'"
            )));
        }
        self.order.push(asset_id.clone());
        self.rows.insert(asset_id, fields);
        Ok(())
    }

    /// Asset ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    pub fn get(&self, asset_id: &str) -> Option<&FieldMap> {
        self.rows.get(asset_id)
    }

    pub fn contains(&self, asset_id: &str) -> bool {
        self.rows.contains_key(asset_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> FieldMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn preserves_insertion_order() {
        let snapshot = Snapshot::from_rows(vec![
            ("A3".to_string(), fields(&[])),
            ("A1".to_string(), fields(&[])),
            ("A2".to_string(), fields(&[])),
        ])
        .unwrap();

        let ids: Vec<_> = snapshot.ids().collect();
        assert_eq!(ids, vec!["A3", "A1", "A2"]);
    }

    #[test]
    fn trims_asset_ids() {
        let snapshot =
            Snapshot::from_rows(vec![("  A1  ".to_string(), fields(&[("name", "Printer")]))])
                .unwrap();
        assert!(snapshot.contains("A1"));
        assert_eq!(snapshot.get("A1").unwrap()["name"], "Printer");
    }

    #[test]
    fn rejects_empty_asset_id() {
        let result = Snapshot::from_rows(vec![("   ".to_string(), fields(&[]))]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_duplicate_asset_id() {
        let result = Snapshot::from_rows(vec![
            ("A1".to_string(), fields(&[])),
            ("A1".to_string(), fields(&[])),
        ]);
        assert!(result.is_err());
    }
}
