//! Shared fixtures for SQLite repository tests.

use chrono::NaiveDate;

use crate::db::{
    Database, HousingType, Property, PropertyRepository, PropertyUnit, SqliteDatabase, User,
    UserRepository,
};

pub async fn setup_db() -> SqliteDatabase {
    let db = SqliteDatabase::in_memory()
        .await
        .expect("Failed to create in-memory database");
    db.migrate().await.expect("Migration should succeed");
    db
}

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("valid date literal")
}

pub async fn create_user(db: &SqliteDatabase, username: &str) -> User {
    db.users()
        .create(&User {
            id: String::new(),
            username: username.to_string(),
            created_at: String::new(),
        })
        .await
        .expect("Create user should succeed")
}

pub fn property(name: &str) -> Property {
    Property {
        id: String::new(),
        name: name.to_string(),
        group_type: None,
        re_group_id: None,
        address_segment: String::new(),
        image: None,
    }
}

pub async fn create_property(db: &SqliteDatabase, name: &str) -> Property {
    db.properties()
        .create(&property(name))
        .await
        .expect("Create property should succeed")
}

pub fn unit(unit_name: &str, property_id: Option<&str>) -> PropertyUnit {
    PropertyUnit {
        id: String::new(),
        unit_name: unit_name.to_string(),
        housing_type: HousingType::Apartment,
        area_sq_ft: 750,
        property_id: property_id.map(str::to_string),
        image: None,
    }
}

pub async fn count(db: &SqliteDatabase, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {}", table))
        .fetch_one(db.pool())
        .await
        .expect("Count query should succeed")
}
