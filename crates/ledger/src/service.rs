//! Transactional assignment saves and snapshot summary reads.

use std::collections::HashMap;

use sqlx::{Row, SqlitePool};
use tracing::info;

use crate::errors::{LedgerError, LedgerResult};
use crate::locks::GroupLocks;
use crate::types::{AssignmentInput, MemberTotal, Summary};

/// Rounding tolerance for a per-item share sum, in minor units. An
/// in-tolerance difference is folded into the first entry so the stored
/// sum equals the item price exactly.
const SHARE_SUM_TOLERANCE_MINOR: i64 = 1;

/// The ledger engine: turns validated assignment payloads into committed
/// transactions and reads consistent settlement summaries.
///
/// Saves for one group are serialized through [`GroupLocks`]; summary
/// reads never take the save lock.
pub struct LedgerService {
    pool: SqlitePool,
    locks: GroupLocks,
}

impl LedgerService {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            locks: GroupLocks::new(),
        }
    }

    /// Replace the assignment sets of every item referenced by `entries`
    /// and bump the group's ledger version, all in one transaction.
    /// Returns the new version.
    pub async fn save_assignments(
        &self,
        group_public_id: &str,
        entries: &[AssignmentInput],
    ) -> LedgerResult<i64> {
        if entries.is_empty() {
            return Err(LedgerError::Validation(
                "assignment payload must not be empty".to_string(),
            ));
        }

        let group_id = self.resolve_group(group_public_id).await?;

        let _guard = self
            .locks
            .try_acquire(group_id)
            .ok_or(LedgerError::ConcurrentSaveConflict)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        // Everything referenced must belong to this group's bills/members.
        let item_rows = sqlx::query(
            "SELECT i.id, i.public_id, i.price_minor
             FROM items i JOIN bills b ON i.bill_id = b.id
             WHERE b.group_id = ?",
        )
        .bind(group_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| LedgerError::Database(e.to_string()))?;

        let mut items: HashMap<String, (i64, i64)> = HashMap::with_capacity(item_rows.len());
        for row in item_rows {
            let public_id: String = row
                .try_get("public_id")
                .map_err(|e| LedgerError::Database(e.to_string()))?;
            let id: i64 = row
                .try_get("id")
                .map_err(|e| LedgerError::Database(e.to_string()))?;
            let price_minor: i64 = row
                .try_get("price_minor")
                .map_err(|e| LedgerError::Database(e.to_string()))?;
            items.insert(public_id, (id, price_minor));
        }

        let member_rows = sqlx::query("SELECT id, public_id FROM members WHERE group_id = ?")
            .bind(group_id)
            .fetch_all(&mut *tx)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let mut members: HashMap<String, i64> = HashMap::with_capacity(member_rows.len());
        for row in member_rows {
            let public_id: String = row
                .try_get("public_id")
                .map_err(|e| LedgerError::Database(e.to_string()))?;
            let id: i64 = row
                .try_get("id")
                .map_err(|e| LedgerError::Database(e.to_string()))?;
            members.insert(public_id, id);
        }

        // Group the payload per item, preserving payload order: the first
        // entry of an item absorbs any in-tolerance rounding difference.
        let mut item_order: Vec<String> = Vec::new();
        let mut per_item: HashMap<String, Vec<(i64, i64)>> = HashMap::new();

        for entry in entries {
            if entry.share_minor < 0 {
                return Err(LedgerError::Validation(format!(
                    "share for item {} must not be negative",
                    entry.item_id
                )));
            }

            if !items.contains_key(&entry.item_id) {
                return Err(LedgerError::Validation(format!(
                    "item {} does not belong to this group",
                    entry.item_id
                )));
            }

            let member_id = members.get(&entry.member_id).ok_or_else(|| {
                LedgerError::Validation(format!(
                    "member {} does not belong to this group",
                    entry.member_id
                ))
            })?;

            let assigns = per_item.entry(entry.item_id.clone()).or_insert_with(|| {
                item_order.push(entry.item_id.clone());
                Vec::new()
            });
            assigns.push((*member_id, entry.share_minor));
        }

        for item_public_id in &item_order {
            let (item_id, price_minor) = items[item_public_id];
            let assigns = per_item.get_mut(item_public_id).expect("grouped above");

            let sum: i64 = assigns.iter().map(|(_, share)| share).sum();
            let diff = price_minor - sum;
            if diff.abs() > SHARE_SUM_TOLERANCE_MINOR {
                return Err(LedgerError::Validation(format!(
                    "shares for item {item_public_id} sum to {sum} but its price is {price_minor}"
                )));
            }
            if diff != 0 {
                assigns[0].1 += diff;
                if assigns[0].1 < 0 {
                    return Err(LedgerError::Validation(format!(
                        "shares for item {item_public_id} exceed its price"
                    )));
                }
            }

            // Full per-item replacement, never a merge: a member absent
            // from the new set is no longer charged for the item.
            sqlx::query("DELETE FROM item_assignments WHERE item_id = ?")
                .bind(item_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| LedgerError::Database(e.to_string()))?;

            for (member_id, share_minor) in assigns.iter() {
                sqlx::query(
                    "INSERT INTO item_assignments (item_id, member_id, share_minor) VALUES (?, ?, ?)",
                )
                .bind(item_id)
                .bind(member_id)
                .bind(share_minor)
                .execute(&mut *tx)
                .await
                .map_err(|e| LedgerError::Database(e.to_string()))?;
            }
        }

        sqlx::query(
            "INSERT INTO ledger_versions (group_id, version) VALUES (?, 1)
             ON CONFLICT(group_id) DO UPDATE SET version = version + 1",
        )
        .bind(group_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| LedgerError::Database(e.to_string()))?;

        let version: i64 = sqlx::query("SELECT version FROM ledger_versions WHERE group_id = ?")
            .bind(group_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?
            .try_get("version")
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        info!(
            group = group_public_id,
            version,
            items = item_order.len(),
            "saved assignments"
        );

        Ok(version)
    }

    /// Snapshot settlement view of a group: bill count, per-member totals,
    /// and the ledger version observed at read time. Runs inside one read
    /// transaction so a concurrent save is either fully visible or not at
    /// all.
    pub async fn summary(&self, group_public_id: &str) -> LedgerResult<Summary> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let group_id: i64 = sqlx::query("SELECT id FROM groups WHERE public_id = ?")
            .bind(group_public_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?
            .ok_or_else(|| LedgerError::GroupNotFound(group_public_id.to_string()))?
            .try_get("id")
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let bill_count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM bills WHERE group_id = ?")
            .bind(group_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?
            .try_get("n")
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        let rows = sqlx::query(
            "SELECT m.public_id, m.name, COALESCE(SUM(a.share_minor), 0) AS total
             FROM members m
             LEFT JOIN item_assignments a ON a.member_id = m.id
             WHERE m.group_id = ?
             GROUP BY m.id
             ORDER BY m.id ASC",
        )
        .bind(group_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| LedgerError::Database(e.to_string()))?;

        let members = rows
            .into_iter()
            .map(|row| {
                Ok(MemberTotal {
                    id: row
                        .try_get("public_id")
                        .map_err(|e| LedgerError::Database(e.to_string()))?,
                    name: row
                        .try_get("name")
                        .map_err(|e| LedgerError::Database(e.to_string()))?,
                    total_owed_minor: row
                        .try_get("total")
                        .map_err(|e| LedgerError::Database(e.to_string()))?,
                })
            })
            .collect::<LedgerResult<Vec<_>>>()?;

        let version: i64 = sqlx::query("SELECT version FROM ledger_versions WHERE group_id = ?")
            .bind(group_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?
            .map(|row| row.try_get("version"))
            .transpose()
            .map_err(|e| LedgerError::Database(e.to_string()))?
            .unwrap_or(0);

        tx.commit()
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?;

        Ok(Summary {
            bill_count,
            members,
            version,
        })
    }

    async fn resolve_group(&self, group_public_id: &str) -> LedgerResult<i64> {
        sqlx::query("SELECT id FROM groups WHERE public_id = ?")
            .bind(group_public_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| LedgerError::Database(e.to_string()))?
            .ok_or_else(|| LedgerError::GroupNotFound(group_public_id.to_string()))?
            .try_get("id")
            .map_err(|e| LedgerError::Database(e.to_string()))
    }
}
