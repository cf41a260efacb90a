//! Asset entity model.

use far_core::numeric;
use far_core::snapshot::FieldMap;
use far_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// One row of the fixed asset register.
///
/// `net_block` is derived (cost minus accumulated depreciation); it is stored
/// for query convenience but recomputed on every write that touches either
/// input, never written independently.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Asset {
    pub id: DbId,
    pub asset_id: String,
    pub name: String,
    pub description: String,
    pub purchase_date: String,
    pub location: String,
    pub status: String,
    pub cost: f64,
    pub accumulated_depreciation: f64,
    pub net_block: f64,
    pub useful_life: i32,
    pub depreciation_rate: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Asset {
    /// Stringify this row into the reconciler's field-map shape, with numeric
    /// columns in canonical form so a freshly loaded snapshot never diffs
    /// against itself.
    pub fn to_field_map(&self) -> FieldMap {
        let mut map = FieldMap::new();
        map.insert("name".into(), self.name.clone());
        map.insert("description".into(), self.description.clone());
        map.insert("purchase_date".into(), self.purchase_date.clone());
        map.insert("location".into(), self.location.clone());
        map.insert("status".into(), self.status.clone());
        map.insert("cost".into(), numeric::normalize(&self.cost.to_string()).value);
        map.insert(
            "accumulated_depreciation".into(),
            numeric::normalize(&self.accumulated_depreciation.to_string()).value,
        );
        map.insert(
            "useful_life".into(),
            numeric::normalize(&self.useful_life.to_string()).value,
        );
        map.insert(
            "depreciation_rate".into(),
            numeric::normalize(&self.depreciation_rate.to_string()).value,
        );
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn field_map_uses_canonical_numeric_form() {
        let asset = Asset {
            id: 1,
            asset_id: "A1".into(),
            name: "Printer".into(),
            description: String::new(),
            purchase_date: "2024-01-15".into(),
            location: "HQ".into(),
            status: "active".into(),
            cost: 100.0,
            accumulated_depreciation: 25.5,
            net_block: 74.5,
            useful_life: 5,
            depreciation_rate: 20.0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let map = asset.to_field_map();
        assert_eq!(map["cost"], "100");
        assert_eq!(map["accumulated_depreciation"], "25.5");
        assert_eq!(map["useful_life"], "5");
        assert_eq!(map["depreciation_rate"], "20");
        // Derived column is not part of the diffable field map.
        assert!(!map.contains_key("net_block"));
    }
}
