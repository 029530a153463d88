//! AutoSplit Database Crate
//!
//! Connection management, migrations, entities, and repository
//! implementations for the AutoSplit backend. This crate owns the durable
//! group/member/bill/item state; assignment rows and the per-group ledger
//! version are written by the ledger crate's transactional paths.

use sqlx::SqlitePool;

use autosplit_config::DatabaseConfig;

pub mod connection;
pub mod entities;
pub mod migrations;
pub mod repos;
pub mod types;

pub use connection::prepare_database;
pub use migrations::run_migrations;

pub use repos::{BillRepository, GroupRepository};

pub use entities::{
    bill::{Bill, BillWithItems, CreateBillRequest},
    group::{CreateGroupRequest, Group, GroupWithMembers},
    item::{CreateItemRequest, Item},
    member::{CreateMemberRequest, Member},
};

pub use types::{errors::DatabaseError, DatabaseResult};

/// Initialize the database: connect and apply migrations.
pub async fn initialize_database(config: &DatabaseConfig) -> DatabaseResult<SqlitePool> {
    let pool = prepare_database(config)
        .await
        .map_err(|e| DatabaseError::ConnectionError(e.to_string()))?;

    run_migrations(&pool)
        .await
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;

    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn create_test_database() -> (SqlitePool, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let config = DatabaseConfig {
            url: db_url,
            max_connections: 1,
        };

        let pool = initialize_database(&config).await.unwrap();
        (pool, temp_dir)
    }

    #[tokio::test]
    async fn test_database_initialization() {
        let (_pool, _temp_dir) = create_test_database().await;
    }

    #[tokio::test]
    async fn test_foreign_keys_enabled() {
        let (pool, _temp_dir) = create_test_database().await;

        let result: (bool,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert!(result.0);
    }

    #[tokio::test]
    async fn test_schema_tables_exist() {
        let (pool, _temp_dir) = create_test_database().await;

        for table in [
            "groups",
            "members",
            "bills",
            "items",
            "item_assignments",
            "ledger_versions",
        ] {
            let count: (i64,) = sqlx::query_as(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
            )
            .bind(table)
            .fetch_one(&pool)
            .await
            .unwrap();
            assert_eq!(count.0, 1, "missing table {table}");
        }
    }
}
