//! Repository traits for data access abstraction.
//!
//! These traits define the contract for data access, allowing different
//! storage backends to be swapped without changing business logic.
//! Futures are `Send` so handlers generic over [`Database`] can run on axum.

use std::future::Future;

use chrono::NaiveDate;

use crate::db::{
    DbResult, LeaseQuery, ListResult, OwnershipQuery, Post, PostQuery, Property,
    PropertyOwnership, PropertyQuery, PropertyUnit, PropertyUnitQuery, RentalLease, Transaction,
    TransactionQuery, User, UserQuery,
};

/// Repository for User operations.
pub trait UserRepository {
    fn create(&self, user: &User) -> impl Future<Output = DbResult<User>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = DbResult<User>> + Send;

    fn list(
        &self,
        query: Option<&UserQuery>,
    ) -> impl Future<Output = DbResult<ListResult<User>>> + Send;

    fn update(&self, user: &User) -> impl Future<Output = DbResult<User>> + Send;

    /// Delete a user and, by cascade, everything referencing them.
    fn delete(&self, id: &str) -> impl Future<Output = DbResult<()>> + Send;
}

/// Repository for Post operations.
pub trait PostRepository {
    fn create(&self, post: &Post) -> impl Future<Output = DbResult<Post>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = DbResult<Post>> + Send;

    fn list(
        &self,
        query: Option<&PostQuery>,
    ) -> impl Future<Output = DbResult<ListResult<Post>>> + Send;

    fn update(&self, post: &Post) -> impl Future<Output = DbResult<Post>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = DbResult<()>> + Send;
}

/// Repository for Property operations.
pub trait PropertyRepository {
    fn create(&self, property: &Property) -> impl Future<Output = DbResult<Property>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = DbResult<Property>> + Send;

    fn list(
        &self,
        query: Option<&PropertyQuery>,
    ) -> impl Future<Output = DbResult<ListResult<Property>>> + Send;

    /// Update a property. Rejects a `re_group` that would form a cycle.
    fn update(&self, property: &Property) -> impl Future<Output = DbResult<Property>> + Send;

    /// Delete a property with its units, ownerships, leases, transactions
    /// and grouped sub-properties.
    fn delete(&self, id: &str) -> impl Future<Output = DbResult<()>> + Send;

    /// Properties grouped directly under `id`.
    fn children(&self, id: &str) -> impl Future<Output = DbResult<Vec<Property>>> + Send;
}

/// Repository for PropertyUnit operations.
///
/// Saving a unit without a property provisions one named after the unit,
/// atomically with the unit write.
pub trait PropertyUnitRepository {
    fn create(&self, unit: &PropertyUnit) -> impl Future<Output = DbResult<PropertyUnit>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = DbResult<PropertyUnit>> + Send;

    fn list(
        &self,
        query: Option<&PropertyUnitQuery>,
    ) -> impl Future<Output = DbResult<ListResult<PropertyUnit>>> + Send;

    fn update(&self, unit: &PropertyUnit) -> impl Future<Output = DbResult<PropertyUnit>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = DbResult<()>> + Send;
}

/// Repository for PropertyOwnership operations.
pub trait OwnershipRepository {
    fn create(
        &self,
        ownership: &PropertyOwnership,
    ) -> impl Future<Output = DbResult<PropertyOwnership>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = DbResult<PropertyOwnership>> + Send;

    fn list(
        &self,
        query: Option<&OwnershipQuery>,
    ) -> impl Future<Output = DbResult<ListResult<PropertyOwnership>>> + Send;

    fn update(
        &self,
        ownership: &PropertyOwnership,
    ) -> impl Future<Output = DbResult<PropertyOwnership>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = DbResult<()>> + Send;

    /// Ownership windows of `property_id` that cover `date`.
    ///
    /// More than one result means overlapping windows were recorded.
    fn owners_on(
        &self,
        property_id: &str,
        date: NaiveDate,
    ) -> impl Future<Output = DbResult<Vec<PropertyOwnership>>> + Send;
}

/// Repository for RentalLease operations.
pub trait LeaseRepository {
    fn create(&self, lease: &RentalLease) -> impl Future<Output = DbResult<RentalLease>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = DbResult<RentalLease>> + Send;

    fn list(
        &self,
        query: Option<&LeaseQuery>,
    ) -> impl Future<Output = DbResult<ListResult<RentalLease>>> + Send;

    fn update(&self, lease: &RentalLease) -> impl Future<Output = DbResult<RentalLease>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = DbResult<()>> + Send;
}

/// Repository for Transaction operations.
pub trait TransactionRepository {
    /// Record a transaction. `datetime` is always set by the repository.
    fn create(
        &self,
        transaction: &Transaction,
    ) -> impl Future<Output = DbResult<Transaction>> + Send;

    fn get(&self, id: &str) -> impl Future<Output = DbResult<Transaction>> + Send;

    fn list(
        &self,
        query: Option<&TransactionQuery>,
    ) -> impl Future<Output = DbResult<ListResult<Transaction>>> + Send;

    /// Update a transaction. The stored `datetime` is never changed.
    fn update(
        &self,
        transaction: &Transaction,
    ) -> impl Future<Output = DbResult<Transaction>> + Send;

    fn delete(&self, id: &str) -> impl Future<Output = DbResult<()>> + Send;
}

/// Combined database interface.
pub trait Database: Send + Sync + 'static {
    type Users<'a>: UserRepository + Send + Sync
    where
        Self: 'a;
    type Posts<'a>: PostRepository + Send + Sync
    where
        Self: 'a;
    type Properties<'a>: PropertyRepository + Send + Sync
    where
        Self: 'a;
    type Units<'a>: PropertyUnitRepository + Send + Sync
    where
        Self: 'a;
    type Ownerships<'a>: OwnershipRepository + Send + Sync
    where
        Self: 'a;
    type Leases<'a>: LeaseRepository + Send + Sync
    where
        Self: 'a;
    type Transactions<'a>: TransactionRepository + Send + Sync
    where
        Self: 'a;

    /// Run pending migrations.
    fn migrate(&self) -> impl Future<Output = DbResult<()>> + Send;

    fn users(&self) -> Self::Users<'_>;

    fn posts(&self) -> Self::Posts<'_>;

    fn properties(&self) -> Self::Properties<'_>;

    fn units(&self) -> Self::Units<'_>;

    fn ownerships(&self) -> Self::Ownerships<'_>;

    fn leases(&self) -> Self::Leases<'_>;

    fn transactions(&self) -> Self::Transactions<'_>;
}
