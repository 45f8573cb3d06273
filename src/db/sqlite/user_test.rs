//! Tests for SqliteUserRepository.

use super::test_support::{create_user, setup_db};
use crate::db::{Database, DbError, PageSort, User, UserQuery, UserRepository};

#[tokio::test(flavor = "multi_thread")]
async fn create_user_sets_id_and_timestamp() {
    let db = setup_db().await;

    let user = create_user(&db, "alice").await;

    assert_eq!(user.id.len(), 8);
    assert!(user.id.chars().all(|c| c.is_ascii_hexdigit()));
    assert!(!user.created_at.is_empty());

    let fetched = db.users().get(&user.id).await.expect("Get should succeed");
    assert_eq!(fetched, user);
}

#[tokio::test(flavor = "multi_thread")]
async fn duplicate_username_is_a_constraint_error() {
    let db = setup_db().await;
    create_user(&db, "alice").await;

    let err = db
        .users()
        .create(&User {
            id: String::new(),
            username: "alice".to_string(),
            created_at: String::new(),
        })
        .await
        .unwrap_err();

    assert!(
        matches!(&err, DbError::Constraint { field, .. } if field == "username"),
        "unexpected error: {:?}",
        err
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn blank_username_is_rejected() {
    let db = setup_db().await;

    let err = db
        .users()
        .create(&User {
            id: String::new(),
            username: "   ".to_string(),
            created_at: String::new(),
        })
        .await
        .unwrap_err();

    assert_eq!(err.field(), Some("username"));
}

#[tokio::test(flavor = "multi_thread")]
async fn update_username_keeps_created_at() {
    let db = setup_db().await;
    let user = create_user(&db, "bob").await;

    let updated = db
        .users()
        .update(&User {
            username: "robert".to_string(),
            created_at: "ignored".to_string(),
            ..user.clone()
        })
        .await
        .expect("Update should succeed");

    assert_eq!(updated.username, "robert");
    assert_eq!(updated.created_at, user.created_at);
}

#[tokio::test(flavor = "multi_thread")]
async fn list_users_sorted_with_limit() {
    let db = setup_db().await;
    for name in ["carol", "alice", "bob"] {
        create_user(&db, name).await;
    }

    let result = db
        .users()
        .list(Some(&UserQuery {
            page: PageSort {
                limit: Some(2),
                ..Default::default()
            },
        }))
        .await
        .unwrap();

    assert_eq!(result.total, 3);
    let names: Vec<_> = result.items.iter().map(|u| u.username.as_str()).collect();
    assert_eq!(names, ["alice", "bob"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn delete_user() {
    let db = setup_db().await;
    let user = create_user(&db, "dave").await;

    db.users().delete(&user.id).await.expect("Delete should succeed");

    assert!(matches!(
        db.users().get(&user.id).await,
        Err(DbError::NotFound { .. })
    ));
    assert!(matches!(
        db.users().delete(&user.id).await,
        Err(DbError::NotFound { .. })
    ));
}
