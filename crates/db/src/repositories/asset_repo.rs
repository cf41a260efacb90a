//! Repository for the `assets` table.
//!
//! Field-level updates take the column name decided by the reconciler; the
//! name is checked against the declared schema before it is interpolated, so
//! only known columns ever reach the query text.

use sqlx::{PgPool, Postgres, Transaction};

use far_core::asset;

use crate::models::asset::Asset;

/// Column list for `assets` SELECT queries.
const COLUMNS: &str = "\
    id, asset_id, name, description, purchase_date, location, status, \
    cost, accumulated_depreciation, net_block, useful_life, \
    depreciation_rate, created_at, updated_at";

/// Provides CRUD operations for the asset register.
pub struct AssetRepo;

impl AssetRepo {
    /// Number of rows currently in the register.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*)::BIGINT FROM assets")
            .fetch_one(pool)
            .await
    }

    /// List the full register in stable row order.
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets ORDER BY id");
        sqlx::query_as::<_, Asset>(&query).fetch_all(pool).await
    }

    /// Find an asset by its external asset_id.
    pub async fn find_by_asset_id(
        pool: &PgPool,
        asset_id: &str,
    ) -> Result<Option<Asset>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM assets WHERE asset_id = $1");
        sqlx::query_as::<_, Asset>(&query)
            .bind(asset_id)
            .fetch_optional(pool)
            .await
    }

    /// Insert a full row from reconciled `(field, value)` pairs.
    ///
    /// Values arrive in canonical string form; numeric columns are parsed
    /// here and `net_block` is computed from cost and accumulated
    /// depreciation.
    pub async fn insert_row(
        tx: &mut Transaction<'_, Postgres>,
        asset_id: &str,
        fields: &[(String, String)],
    ) -> Result<Asset, sqlx::Error> {
        let get = |name: &str| {
            fields
                .iter()
                .find(|(f, _)| f == name)
                .map(|(_, v)| v.as_str())
                .unwrap_or("")
        };
        let num = |name: &str| get(name).parse::<f64>().unwrap_or(0.0);

        let cost = num("cost");
        let accumulated_depreciation = num("accumulated_depreciation");
        let net_block = asset::net_block(cost, accumulated_depreciation);

        let query = format!(
            "INSERT INTO assets (\
                asset_id, name, description, purchase_date, location, status, \
                cost, accumulated_depreciation, net_block, useful_life, \
                depreciation_rate\
             ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Asset>(&query)
            .bind(asset_id)
            .bind(get("name"))
            .bind(get("description"))
            .bind(get("purchase_date"))
            .bind(get("location"))
            .bind(get("status"))
            .bind(cost)
            .bind(accumulated_depreciation)
            .bind(net_block)
            .bind(num("useful_life") as i32)
            .bind(num("depreciation_rate"))
            .fetch_one(&mut **tx)
            .await
    }

    /// Update one field of an existing row.
    ///
    /// Returns `RowNotFound` if the column is not in the declared schema or
    /// no row matches; derived columns are rejected the same way since they
    /// are never written independently.
    pub async fn update_field(
        tx: &mut Transaction<'_, Postgres>,
        asset_id: &str,
        field: &str,
        value: &str,
    ) -> Result<(), sqlx::Error> {
        if !asset::FIELDS.contains(&field) {
            return Err(sqlx::Error::RowNotFound);
        }

        let query =
            format!("UPDATE assets SET {field} = $1, updated_at = now() WHERE asset_id = $2");

        let result = if field == "useful_life" {
            let parsed = value.parse::<f64>().unwrap_or(0.0) as i32;
            sqlx::query(&query)
                .bind(parsed)
                .bind(asset_id)
                .execute(&mut **tx)
                .await?
        } else if asset::is_numeric_field(field) {
            let parsed = value.parse::<f64>().unwrap_or(0.0);
            sqlx::query(&query)
                .bind(parsed)
                .bind(asset_id)
                .execute(&mut **tx)
                .await?
        } else {
            sqlx::query(&query)
                .bind(value)
                .bind(asset_id)
                .execute(&mut **tx)
                .await?
        };

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }

    /// Recompute the derived net_block column from cost and accumulated
    /// depreciation.
    pub async fn recompute_net_block(
        tx: &mut Transaction<'_, Postgres>,
        asset_id: &str,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE assets SET net_block = cost - accumulated_depreciation, \
             updated_at = now() WHERE asset_id = $1",
        )
        .bind(asset_id)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }

    /// Delete a row by asset_id.
    pub async fn delete(
        tx: &mut Transaction<'_, Postgres>,
        asset_id: &str,
    ) -> Result<(), sqlx::Error> {
        let result = sqlx::query("DELETE FROM assets WHERE asset_id = $1")
            .bind(asset_id)
            .execute(&mut **tx)
            .await?;
        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }
        Ok(())
    }
}
