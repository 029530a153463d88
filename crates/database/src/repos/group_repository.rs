//! Repository for group and member data access operations.

use crate::entities::{CreateGroupRequest, Group, GroupWithMembers, Member};
use crate::types::{DatabaseError, DatabaseResult};
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::info;
use uuid::Uuid;

/// Repository for group database operations
pub struct GroupRepository {
    pool: SqlitePool,
}

impl GroupRepository {
    /// Create a new group repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a group together with its member roster. Membership is fixed
    /// at creation; there is no separate member insert path.
    pub async fn create(&self, request: &CreateGroupRequest) -> DatabaseResult<GroupWithMembers> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(DatabaseError::ValidationError(
                "group name must not be empty".to_string(),
            ));
        }

        for member in &request.members {
            if member.name.trim().is_empty() {
                return Err(DatabaseError::ValidationError(
                    "member name must not be empty".to_string(),
                ));
            }
        }

        let now = Utc::now().to_rfc3339();
        let group_public_id = Uuid::new_v4().to_string();

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;

        let result = sqlx::query(
            "INSERT INTO groups (public_id, name, created_at) VALUES (?, ?, ?)",
        )
        .bind(&group_public_id)
        .bind(name)
        .bind(&now)
        .execute(&mut *tx)
        .await
        .map_err(|e| DatabaseError::QueryError(e.to_string()))?;

        let group_id = result.last_insert_rowid();
        let mut members = Vec::with_capacity(request.members.len());

        for member in &request.members {
            let member_public_id = Uuid::new_v4().to_string();
            let inserted = sqlx::query(
                "INSERT INTO members (public_id, group_id, name, upi_id, venmo_id, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&member_public_id)
            .bind(group_id)
            .bind(member.name.trim())
            .bind(&member.upi_id)
            .bind(&member.venmo_id)
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;

            members.push(Member {
                id: inserted.last_insert_rowid(),
                public_id: member_public_id,
                group_id,
                name: member.name.trim().to_string(),
                upi_id: member.upi_id.clone(),
                venmo_id: member.venmo_id.clone(),
                created_at: now.clone(),
            });
        }

        tx.commit()
            .await
            .map_err(|e| DatabaseError::QueryError(e.to_string()))?;

        info!(
            group_id = group_id,
            public_id = %group_public_id,
            member_count = members.len(),
            "created group"
        );

        Ok(GroupWithMembers {
            group: Group {
                id: group_id,
                public_id: group_public_id,
                name: name.to_string(),
                created_at: now,
            },
            members,
        })
    }

    /// Find a group and its members by the group's public id.
    pub async fn find_by_public_id(
        &self,
        public_id: &str,
    ) -> DatabaseResult<Option<GroupWithMembers>> {
        let row = sqlx::query(
            "SELECT id, public_id, name, created_at FROM groups WHERE public_id = ?",
        )
        .bind(public_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(e.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let group = Group {
            id: row
                .try_get("id")
                .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
            public_id: row
                .try_get("public_id")
                .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
            name: row
                .try_get("name")
                .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
            created_at: row
                .try_get("created_at")
                .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
        };

        let members = self.members_of(group.id).await?;

        Ok(Some(GroupWithMembers { group, members }))
    }

    /// List a group's members in creation order. The ledger's
    /// empty-selection split relies on this ordering being stable.
    pub async fn members_of(&self, group_id: i64) -> DatabaseResult<Vec<Member>> {
        let rows = sqlx::query(
            "SELECT id, public_id, group_id, name, upi_id, venmo_id, created_at
             FROM members WHERE group_id = ? ORDER BY id ASC",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DatabaseError::QueryError(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                Ok(Member {
                    id: row
                        .try_get("id")
                        .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
                    public_id: row
                        .try_get("public_id")
                        .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
                    group_id: row
                        .try_get("group_id")
                        .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
                    name: row
                        .try_get("name")
                        .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
                    upi_id: row
                        .try_get("upi_id")
                        .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
                    venmo_id: row
                        .try_get("venmo_id")
                        .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
                    created_at: row
                        .try_get("created_at")
                        .map_err(|e| DatabaseError::QueryError(e.to_string()))?,
                })
            })
            .collect()
    }
}
