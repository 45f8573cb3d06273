//! Tests for SqliteOwnershipRepository.

use super::test_support::{create_property, create_user, date, setup_db};
use crate::db::{
    Database, DbError, OwnershipQuery, OwnershipRepository, PropertyOwnership, SqliteDatabase,
};

fn ownership(
    property_id: &str,
    user_id: &str,
    start: &str,
    end: Option<&str>,
) -> PropertyOwnership {
    PropertyOwnership {
        id: String::new(),
        property_id: property_id.to_string(),
        user_id: user_id.to_string(),
        start_date: date(start),
        end_date: end.map(date),
    }
}

async fn fixture(db: &SqliteDatabase) -> (String, String, String) {
    let property = create_property(db, "Villa").await;
    let alice = create_user(db, "alice").await;
    let bob = create_user(db, "bob").await;
    (property.id, alice.id, bob.id)
}

#[tokio::test(flavor = "multi_thread")]
async fn create_and_get_ownership() {
    let db = setup_db().await;
    let (property_id, alice, _) = fixture(&db).await;

    let created = db
        .ownerships()
        .create(&ownership(&property_id, &alice, "2020-01-01", Some("2022-12-31")))
        .await
        .expect("Create should succeed");

    let fetched = db.ownerships().get(&created.id).await.unwrap();
    assert_eq!(fetched, created);
    assert_eq!(fetched.end_date, Some(date("2022-12-31")));
}

#[tokio::test(flavor = "multi_thread")]
async fn same_start_date_for_a_property_is_rejected() {
    let db = setup_db().await;
    let (property_id, alice, bob) = fixture(&db).await;
    db.ownerships()
        .create(&ownership(&property_id, &alice, "2021-06-01", None))
        .await
        .unwrap();

    let err = db
        .ownerships()
        .create(&ownership(&property_id, &bob, "2021-06-01", None))
        .await
        .unwrap_err();

    assert!(
        matches!(&err, DbError::Constraint { field, .. } if field == "start_date"),
        "unexpected error: {:?}",
        err
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn overlapping_windows_with_different_starts_are_allowed() {
    let db = setup_db().await;
    let (property_id, alice, bob) = fixture(&db).await;

    db.ownerships()
        .create(&ownership(&property_id, &alice, "2020-01-01", None))
        .await
        .unwrap();
    db.ownerships()
        .create(&ownership(&property_id, &bob, "2021-01-01", Some("2021-12-31")))
        .await
        .expect("Overlapping ownership should be stored");

    let owners = db
        .ownerships()
        .owners_on(&property_id, date("2021-07-15"))
        .await
        .unwrap();
    let users: Vec<_> = owners.iter().map(|o| o.user_id.as_str()).collect();
    assert_eq!(users, [alice.as_str(), bob.as_str()]);
}

#[tokio::test(flavor = "multi_thread")]
async fn owners_on_respects_window_bounds() {
    let db = setup_db().await;
    let (property_id, alice, bob) = fixture(&db).await;
    db.ownerships()
        .create(&ownership(&property_id, &alice, "2019-01-01", Some("2019-12-31")))
        .await
        .unwrap();
    db.ownerships()
        .create(&ownership(&property_id, &bob, "2020-01-01", None))
        .await
        .unwrap();

    let before = db
        .ownerships()
        .owners_on(&property_id, date("2018-12-31"))
        .await
        .unwrap();
    assert!(before.is_empty());

    let last_day = db
        .ownerships()
        .owners_on(&property_id, date("2019-12-31"))
        .await
        .unwrap();
    assert_eq!(last_day.len(), 1);
    assert_eq!(last_day[0].user_id, alice);
    assert!(last_day[0].covers(date("2019-12-31")));

    let open_ended = db
        .ownerships()
        .owners_on(&property_id, date("2030-01-01"))
        .await
        .unwrap();
    assert_eq!(open_ended.len(), 1);
    assert_eq!(open_ended[0].user_id, bob);
}

#[tokio::test(flavor = "multi_thread")]
async fn end_before_start_is_rejected() {
    let db = setup_db().await;
    let (property_id, alice, _) = fixture(&db).await;

    let err = db
        .ownerships()
        .create(&ownership(&property_id, &alice, "2022-01-01", Some("2021-01-01")))
        .await
        .unwrap_err();

    assert_eq!(err.field(), Some("end_date"));
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_user_or_property_is_rejected() {
    let db = setup_db().await;
    let (property_id, alice, _) = fixture(&db).await;

    let err = db
        .ownerships()
        .create(&ownership(&property_id, "ffffffff", "2022-01-01", None))
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("user"));

    let err = db
        .ownerships()
        .create(&ownership("ffffffff", &alice, "2022-01-01", None))
        .await
        .unwrap_err();
    assert_eq!(err.field(), Some("property"));
}

#[tokio::test(flavor = "multi_thread")]
async fn update_closes_an_open_ownership() {
    let db = setup_db().await;
    let (property_id, alice, _) = fixture(&db).await;
    let mut created = db
        .ownerships()
        .create(&ownership(&property_id, &alice, "2020-01-01", None))
        .await
        .unwrap();

    created.end_date = Some(date("2024-03-31"));
    db.ownerships().update(&created).await.expect("Update should succeed");

    let stored = db.ownerships().get(&created.id).await.unwrap();
    assert_eq!(stored.end_date, Some(date("2024-03-31")));
}

#[tokio::test(flavor = "multi_thread")]
async fn list_and_delete_ownerships() {
    let db = setup_db().await;
    let (property_id, alice, bob) = fixture(&db).await;
    let first = db
        .ownerships()
        .create(&ownership(&property_id, &alice, "2020-01-01", None))
        .await
        .unwrap();
    db.ownerships()
        .create(&ownership(&property_id, &bob, "2021-01-01", None))
        .await
        .unwrap();

    let for_bob = db
        .ownerships()
        .list(Some(&OwnershipQuery {
            user_id: Some(bob.clone()),
            ..Default::default()
        }))
        .await
        .unwrap();
    assert_eq!(for_bob.total, 1);

    db.ownerships().delete(&first.id).await.unwrap();
    let remaining = db.ownerships().list(None).await.unwrap();
    assert_eq!(remaining.total, 1);
    assert_eq!(remaining.items[0].user_id, bob);
}
