//! Integration tests for the group and bill repositories.

use autosplit_config::DatabaseConfig;
use autosplit_database::{
    initialize_database, BillRepository, CreateBillRequest, CreateGroupRequest,
    CreateItemRequest, CreateMemberRequest, DatabaseError, GroupRepository,
};
use sqlx::SqlitePool;
use tempfile::TempDir;

async fn test_pool() -> (SqlitePool, TempDir) {
    let temp_dir = TempDir::new().expect("create temp dir");
    let db_path = temp_dir.path().join("repos.db");
    let config = DatabaseConfig {
        url: format!("sqlite://{}", db_path.display()),
        max_connections: 2,
    };
    let pool = initialize_database(&config).await.expect("init database");
    (pool, temp_dir)
}

fn member(name: &str) -> CreateMemberRequest {
    CreateMemberRequest {
        name: name.to_string(),
        upi_id: None,
        venmo_id: None,
    }
}

#[tokio::test]
async fn create_and_fetch_group_with_members() {
    let (pool, _dir) = test_pool().await;
    let repo = GroupRepository::new(pool);

    let created = repo
        .create(&CreateGroupRequest {
            name: "Trip to Goa".to_string(),
            members: vec![member("Alice"), member("Bob")],
        })
        .await
        .expect("create group");

    assert_eq!(created.group.name, "Trip to Goa");
    assert_eq!(created.members.len(), 2);
    assert_eq!(created.members[0].name, "Alice");
    assert_eq!(created.members[1].name, "Bob");

    let fetched = repo
        .find_by_public_id(&created.group.public_id)
        .await
        .expect("fetch group")
        .expect("group exists");

    assert_eq!(fetched.group.public_id, created.group.public_id);
    // Creation order is preserved; the ledger's equal split depends on it.
    let names: Vec<_> = fetched.members.iter().map(|m| m.name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "Bob"]);
}

#[tokio::test]
async fn unknown_group_returns_none() {
    let (pool, _dir) = test_pool().await;
    let repo = GroupRepository::new(pool);

    let fetched = repo.find_by_public_id("no-such-group").await.expect("query");
    assert!(fetched.is_none());
}

#[tokio::test]
async fn empty_group_name_is_rejected() {
    let (pool, _dir) = test_pool().await;
    let repo = GroupRepository::new(pool);

    let result = repo
        .create(&CreateGroupRequest {
            name: "   ".to_string(),
            members: vec![],
        })
        .await;

    assert!(matches!(result, Err(DatabaseError::ValidationError(_))));
}

#[tokio::test]
async fn create_bill_with_items() {
    let (pool, _dir) = test_pool().await;
    let groups = GroupRepository::new(pool.clone());
    let bills = BillRepository::new(pool);

    let group = groups
        .create(&CreateGroupRequest {
            name: "Dinner".to_string(),
            members: vec![member("Alice")],
        })
        .await
        .expect("create group");

    let bill = bills
        .create(&CreateBillRequest {
            group_id: group.group.public_id.clone(),
            total_minor: Some(1500),
            items: vec![
                CreateItemRequest {
                    description: "Pizza".to_string(),
                    price_minor: 1000,
                },
                CreateItemRequest {
                    description: "Soda".to_string(),
                    price_minor: 500,
                },
            ],
        })
        .await
        .expect("create bill");

    assert_eq!(bill.items.len(), 2);
    assert_eq!(bill.bill.total_minor, Some(1500));

    let fetched = bills
        .find_by_public_id(&bill.bill.public_id)
        .await
        .expect("fetch bill")
        .expect("bill exists");
    assert_eq!(fetched.items[0].description, "Pizza");
    assert_eq!(fetched.items[1].price_minor, 500);
}

#[tokio::test]
async fn bill_for_unknown_group_is_rejected() {
    let (pool, _dir) = test_pool().await;
    let bills = BillRepository::new(pool);

    let result = bills
        .create(&CreateBillRequest {
            group_id: "missing".to_string(),
            total_minor: None,
            items: vec![CreateItemRequest {
                description: "Pizza".to_string(),
                price_minor: 1000,
            }],
        })
        .await;

    assert!(matches!(result, Err(DatabaseError::NotFound(_))));
}

#[tokio::test]
async fn negative_item_price_is_rejected() {
    let (pool, _dir) = test_pool().await;
    let groups = GroupRepository::new(pool.clone());
    let bills = BillRepository::new(pool);

    let group = groups
        .create(&CreateGroupRequest {
            name: "Dinner".to_string(),
            members: vec![member("Alice")],
        })
        .await
        .expect("create group");

    let result = bills
        .create(&CreateBillRequest {
            group_id: group.group.public_id,
            total_minor: None,
            items: vec![CreateItemRequest {
                description: "Refund".to_string(),
                price_minor: -100,
            }],
        })
        .await;

    assert!(matches!(result, Err(DatabaseError::ValidationError(_))));
}
