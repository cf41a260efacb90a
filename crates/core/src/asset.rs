//! The declared asset schema: column order, numeric fields, derived fields.
//!
//! The reconciler iterates these constants instead of whatever keys happen to
//! be present on a row, so a stray or misspelled column can never produce a
//! phantom diff.

/// Editable asset columns, in declared table order.
///
/// `asset_id` is the row key and is not listed; `net_block` is derived and is
/// excluded from diffing (see [`DERIVED_FIELDS`]).
pub const FIELDS: &[&str] = &[
    "name",
    "description",
    "purchase_date",
    "location",
    "status",
    "cost",
    "accumulated_depreciation",
    "useful_life",
    "depreciation_rate",
];

/// Columns whose values are compared after numeric normalization.
pub const NUMERIC_FIELDS: &[&str] = &[
    "cost",
    "accumulated_depreciation",
    "useful_life",
    "depreciation_rate",
];

/// Columns that are recomputed from other columns and never diffed or written
/// independently.
pub const DERIVED_FIELDS: &[&str] = &["net_block"];

/// True when `field` is one of the declared numeric columns.
pub fn is_numeric_field(field: &str) -> bool {
    NUMERIC_FIELDS.contains(&field)
}

/// True when `field` is derived and must be excluded from reconciliation.
pub fn is_derived_field(field: &str) -> bool {
    DERIVED_FIELDS.contains(&field)
}

/// True when a change to `field` requires recomputing `net_block`.
pub fn affects_net_block(field: &str) -> bool {
    field == "cost" || field == "accumulated_depreciation"
}

/// Net block is always cost minus accumulated depreciation.
pub fn net_block(cost: f64, accumulated_depreciation: f64) -> f64 {
    cost - accumulated_depreciation
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn net_block_is_cost_minus_depreciation() {
        assert_eq!(net_block(1000.0, 250.0), 750.0);
    }

    #[test]
    fn derived_fields_are_not_declared_columns() {
        for derived in DERIVED_FIELDS {
            assert!(!FIELDS.contains(derived));
        }
    }

    #[test]
    fn numeric_fields_are_declared_columns() {
        for numeric in NUMERIC_FIELDS {
            assert!(FIELDS.contains(numeric));
        }
    }

    #[test]
    fn cost_and_depreciation_affect_net_block() {
        assert!(affects_net_block("cost"));
        assert!(affects_net_block("accumulated_depreciation"));
        assert!(!affects_net_block("status"));
    }
}
