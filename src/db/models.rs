//! Domain models for the estate database.
//!
//! These models are storage-agnostic and represent the core entities
//! used throughout the application.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::money::Money;

// =============================================================================
// Query Types for Pagination and Sorting
// =============================================================================

/// Sort order for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Base pagination and sorting options - composed into entity-specific queries.
#[derive(Debug, Clone, Default)]
pub struct PageSort {
    /// Maximum number of items to return.
    pub limit: Option<usize>,
    /// Number of items to skip.
    pub offset: Option<usize>,
    /// Field to sort by (validated per entity type).
    pub sort_by: Option<String>,
    /// Sort order (ascending or descending).
    pub sort_order: Option<SortOrder>,
}

/// Query for Users - pagination only.
#[derive(Debug, Clone, Default)]
pub struct UserQuery {
    pub page: PageSort,
}

/// Query for Posts - pagination + author filter.
#[derive(Debug, Clone, Default)]
pub struct PostQuery {
    pub page: PageSort,
    pub author_id: Option<String>,
}

/// Query for Properties - pagination + grouping filters.
#[derive(Debug, Clone, Default)]
pub struct PropertyQuery {
    pub page: PageSort,
    /// Only properties grouped directly under this property.
    pub re_group_id: Option<String>,
    pub group_type: Option<GroupType>,
}

/// Query for PropertyUnits - pagination + property/type filters.
#[derive(Debug, Clone, Default)]
pub struct PropertyUnitQuery {
    pub page: PageSort,
    pub property_id: Option<String>,
    pub housing_type: Option<HousingType>,
}

/// Query for PropertyOwnerships - pagination + property/user filters.
#[derive(Debug, Clone, Default)]
pub struct OwnershipQuery {
    pub page: PageSort,
    pub property_id: Option<String>,
    pub user_id: Option<String>,
}

/// Query for RentalLeases - pagination + property/party filters.
#[derive(Debug, Clone, Default)]
pub struct LeaseQuery {
    pub page: PageSort,
    pub property_id: Option<String>,
    pub tenant_user_id: Option<String>,
    pub owner_user_id: Option<String>,
}

/// Query for Transactions - pagination + property/user filters.
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    pub page: PageSort,
    pub property_id: Option<String>,
    /// Matches either side of the transaction (sender or receiver).
    pub user_id: Option<String>,
}

/// Result of a paginated list query.
#[derive(Debug, Clone)]
pub struct ListResult<T> {
    /// The items in this page.
    pub items: Vec<T>,
    /// Total count of all matching items (before pagination).
    pub total: usize,
    /// Limit that was applied.
    pub limit: Option<usize>,
    /// Offset that was applied.
    pub offset: usize,
}

/// 8-character hex ID type used for all entities.
pub type Id = String;

// =============================================================================
// Entities
// =============================================================================

/// Local record of a user known to the external identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub username: String,
    pub created_at: String,
}

/// A blog-style post written by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Id,
    pub title: String,
    pub author_id: Id,
    pub body: String,
}

/// Kind of a self-contained housing unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HousingType {
    Apartment,
    Studio,
    Flat,
    Plot,
}

impl std::fmt::Display for HousingType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HousingType::Apartment => "apartment",
            HousingType::Studio => "studio",
            HousingType::Flat => "flat",
            HousingType::Plot => "plot",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for HousingType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "apartment" => Ok(HousingType::Apartment),
            "studio" => Ok(HousingType::Studio),
            "flat" => Ok(HousingType::Flat),
            "plot" => Ok(HousingType::Plot),
            _ => Err(format!("Invalid housing type: {}", s)),
        }
    }
}

/// Kind of grouping a property represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GroupType {
    Floor,
    Building,
    MultiStoreyApartment,
}

impl std::fmt::Display for GroupType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GroupType::Floor => "floor",
            GroupType::Building => "building",
            GroupType::MultiStoreyApartment => "multi-storey-apartment",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for GroupType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "floor" => Ok(GroupType::Floor),
            "building" => Ok(GroupType::Building),
            "multi-storey-apartment" => Ok(GroupType::MultiStoreyApartment),
            _ => Err(format!("Invalid group type: {}", s)),
        }
    }
}

/// A piece of real estate, or a grouping node (floor, building) over others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    pub id: Id,
    pub name: String,
    pub group_type: Option<GroupType>,
    /// Parent grouping property (e.g. the building a floor belongs to).
    pub re_group_id: Option<Id>,
    /// Free-form address fragment; empty when not provided.
    #[serde(default)]
    pub address_segment: String,
    pub image: Option<String>,
}

/// A self-contained housing unit, always backed by exactly one property once stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyUnit {
    pub id: Id,
    pub unit_name: String,
    pub housing_type: HousingType,
    pub area_sq_ft: i64,
    /// `None` on input asks the repository to provision a property for the unit.
    pub property_id: Option<Id>,
    pub image: Option<String>,
}

/// Ownership of a property by a user over a date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyOwnership {
    pub id: Id,
    pub property_id: Id,
    pub user_id: Id,
    pub start_date: NaiveDate,
    /// `None` means the ownership is ongoing.
    pub end_date: Option<NaiveDate>,
}

impl PropertyOwnership {
    /// Whether this ownership window covers the given date.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && self.end_date.is_none_or(|end| date <= end)
    }
}

/// A tenancy agreement over a property between an owner and a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RentalLease {
    pub id: Id,
    pub start_date: NaiveDate,
    pub stop_date: NaiveDate,
    pub property_id: Id,
    pub rent_amount: Money,
    pub payment_frequency: String,
    pub tenant_user_id: Id,
    pub owner_user_id: Id,
    pub rent_agreement_document: Option<String>,
}

/// A money movement between two users in relation to a property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Id,
    /// Set by the repository on create and never changed afterwards.
    pub datetime: String,
    pub amount: Money,
    pub property_id: Id,
    pub to_user_id: Id,
    pub from_user_id: Id,
    pub transaction_details: Option<String>,
}
