//! Repository for bill and item data access operations.

use crate::entities::{Bill, BillWithItems, CreateBillRequest, Item};
use crate::types::{DatabaseError, DatabaseResult};
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

/// Repository for bill database operations
pub struct BillRepository {
    pool: SqlitePool,
}

impl BillRepository {
    /// Create a new bill repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Store a parsed bill and its line items for a group. Bills are
    /// immutable once created.
    pub async fn create(&self, request: &CreateBillRequest) -> DatabaseResult<BillWithItems> {
        for item in &request.items {
            if item.description.trim().is_empty() {
                return Err(DatabaseError::ValidationError(
                    "item description must not be empty".to_string(),
                ));
            }
            if item.price_minor < 0 {
                return Err(DatabaseError::ValidationError(format!(
                    "item '{}' has a negative price",
                    item.description
                )));
            }
        }

        let group_id: i64 = sqlx::query("SELECT id FROM groups WHERE public_id = ?")
            .bind(&request.group_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?
            .ok_or_else(|| DatabaseError::NotFound(format!("group {}", request.group_id)))?
            .try_get("id")
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;

        let now = Utc::now().to_rfc3339();
        let bill_public_id = Uuid::new_v4().to_string();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;

        let result = sqlx::query(
            "INSERT INTO bills (public_id, group_id, total_minor, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&bill_public_id)
        .bind(group_id)
        .bind(request.total_minor)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|e| DatabaseError::QueryError(e.to_string()))?;

        let bill_id = result.last_insert_rowid();
        let mut items = Vec::with_capacity(request.items.len());

        for item in &request.items {
            let item_public_id = Uuid::new_v4().to_string();
            let inserted = sqlx::query(
                "INSERT INTO items (public_id, bill_id, description, price_minor) VALUES (?, ?, ?, ?)",
            )
            .bind(&item_public_id)
            .bind(bill_id)
            .bind(item.description.trim())
            .bind(item.price_minor)
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;

            items.push(Item {
                id: inserted.last_insert_rowid(),
                public_id: item_public_id,
                bill_id,
                description: item.description.trim().to_string(),
                price_minor: item.price_minor,
            });
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;

        info!(
            bill_id = bill_id,
            public_id = %bill_public_id,
            group_id = group_id,
            item_count = items.len(),
            "stored bill"
        );

        Ok(BillWithItems {
            bill: Bill {
                id: bill_id,
                public_id: bill_public_id,
                group_id,
                total_minor: request.total_minor,
                created_at: now,
            },
            items,
        })
    }

    /// List every item across all bills of a group.
    pub async fn items_of_group(&self, group_id: i64) -> DatabaseResult<Vec<Item>> {
        let rows = sqlx::query(
            "SELECT i.id, i.public_id, i.bill_id, i.description, i.price_minor
             FROM items i JOIN bills b ON i.bill_id = b.id
             WHERE b.group_id = ? ORDER BY i.id ASC",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                Ok(Item {
                    id: row
                        .try_get("id")
                        .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
                    public_id: row
                        .try_get("public_id")
                        .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
                    bill_id: row
                        .try_get("bill_id")
                        .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
                    description: row
                        .try_get("description")
                        .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
                    price_minor: row
                        .try_get("price_minor")
                        .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
                })
            })
            .collect()
    }

    /// Find a bill and its items by the bill's public id.
    pub async fn find_by_public_id(&self, public_id: &str) -> DatabaseResult<Option<BillWithItems>> {
        let row = sqlx::query(
            "SELECT id, public_id, group_id, total_minor, created_at
             FROM bills WHERE public_id = ?",
        )
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let bill = Bill {
            id: row
                .try_get("id")
                .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
            public_id: row
                .try_get("public_id")
                .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
            group_id: row
                .try_get("group_id")
                .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
            total_minor: row
                .try_get("total_minor")
                .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
            created_at: row
                .try_get("created_at")
                .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
        };

        let rows = sqlx::query(
            "SELECT id, public_id, bill_id, description, price_minor
             FROM items WHERE bill_id = ? ORDER BY id ASC",
        )
        .bind(bill.id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(e.to_string()))?;

        let items = rows
            .into_iter()
            .map(|row| {
                Ok(Item {
                    id: row
                        .try_get("id")
                        .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
                    public_id: row
                        .try_get("public_id")
                        .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
                    bill_id: row
                        .try_get("bill_id")
                        .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
                    description: row
                        .try_get("description")
                        .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
                    price_minor: row
                        .try_get("price_minor")
                        .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
                })
            })
            .collect::<DatabaseResult<Vec<_>>>()?;

        Ok(Some(BillWithItems { bill, items }))
    }
}
