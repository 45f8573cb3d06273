//! API route configuration.

use axum::Router;
use axum::routing::{delete, get, patch, post};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use super::handlers::{self, HealthResponse};
use super::state::AppState;
use super::v1::{self, *};
use crate::db::Database;

/// Build routes with generic database type.
///
/// Applies the turbofish for handlers that are generic over the Database trait.
macro_rules! routes {
    ($D:ty => {
        $($method:ident $path:literal => $($handler:ident)::+),* $(,)?
    }) => {{
        let router = Router::new();
        $(
            let router = router.route($path, $method($($handler)::+::<$D>));
        )*
        router
    }};
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Estate API",
        version = "0.1.0",
        description = "Administration API for properties, units, ownership, leases and transactions"
    ),
    paths(
        handlers::health,
        v1::list_users,
        v1::get_user,
        v1::create_user,
        v1::patch_user,
        v1::delete_user,
        v1::list_posts,
        v1::get_post,
        v1::create_post,
        v1::patch_post,
        v1::delete_post,
        v1::list_properties,
        v1::get_property,
        v1::create_property,
        v1::patch_property,
        v1::delete_property,
        v1::list_property_children,
        v1::list_property_owners,
        v1::list_units,
        v1::get_unit,
        v1::create_unit,
        v1::patch_unit,
        v1::delete_unit,
        v1::list_ownerships,
        v1::get_ownership,
        v1::create_ownership,
        v1::patch_ownership,
        v1::delete_ownership,
        v1::list_leases,
        v1::get_lease,
        v1::create_lease,
        v1::patch_lease,
        v1::delete_lease,
        v1::list_transactions,
        v1::get_transaction,
        v1::create_transaction,
        v1::patch_transaction,
        v1::delete_transaction,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            UserResponse,
            CreateUserRequest,
            PatchUserRequest,
            PaginatedUsers,
            PostResponse,
            CreatePostRequest,
            PatchPostRequest,
            PaginatedPosts,
            PropertyResponse,
            CreatePropertyRequest,
            PatchPropertyRequest,
            PaginatedProperties,
            UnitResponse,
            CreateUnitRequest,
            PatchUnitRequest,
            PaginatedUnits,
            OwnershipResponse,
            CreateOwnershipRequest,
            PatchOwnershipRequest,
            PaginatedOwnerships,
            LeaseResponse,
            CreateLeaseRequest,
            PatchLeaseRequest,
            PaginatedLeases,
            TransactionResponse,
            CreateTransactionRequest,
            PatchTransactionRequest,
            PaginatedTransactions,
        )
    ),
    tags(
        (name = "system", description = "System health and status endpoints"),
        (name = "users", description = "Mirrored identity-provider users"),
        (name = "posts", description = "Blog-style posts"),
        (name = "properties", description = "Properties and their grouping tree"),
        (name = "units", description = "Housing units"),
        (name = "ownerships", description = "Ownership windows"),
        (name = "leases", description = "Rental leases"),
        (name = "transactions", description = "Money movements between users")
    )
)]
pub struct ApiDoc;

/// Create the API router, optionally serving OpenAPI docs at `/docs`.
pub fn create_router<D: Database + 'static>(state: AppState<D>, enable_docs: bool) -> Router {
    let system_routes = Router::new().route("/health", get(handlers::health));

    let user_routes = routes!(D => {
        get "/users" => v1::list_users,
        get "/users/{id}" => v1::get_user,
        post "/users" => v1::create_user,
        patch "/users/{id}" => v1::patch_user,
        delete "/users/{id}" => v1::delete_user,
    });

    let post_routes = routes!(D => {
        get "/posts" => v1::list_posts,
        get "/posts/{id}" => v1::get_post,
        post "/posts" => v1::create_post,
        patch "/posts/{id}" => v1::patch_post,
        delete "/posts/{id}" => v1::delete_post,
    });

    let property_routes = routes!(D => {
        get "/properties" => v1::list_properties,
        get "/properties/{id}" => v1::get_property,
        post "/properties" => v1::create_property,
        patch "/properties/{id}" => v1::patch_property,
        delete "/properties/{id}" => v1::delete_property,
        get "/properties/{id}/children" => v1::list_property_children,
        get "/properties/{id}/owners" => v1::list_property_owners,
    });

    let unit_routes = routes!(D => {
        get "/units" => v1::list_units,
        get "/units/{id}" => v1::get_unit,
        post "/units" => v1::create_unit,
        patch "/units/{id}" => v1::patch_unit,
        delete "/units/{id}" => v1::delete_unit,
    });

    let ownership_routes = routes!(D => {
        get "/ownerships" => v1::list_ownerships,
        get "/ownerships/{id}" => v1::get_ownership,
        post "/ownerships" => v1::create_ownership,
        patch "/ownerships/{id}" => v1::patch_ownership,
        delete "/ownerships/{id}" => v1::delete_ownership,
    });

    let lease_routes = routes!(D => {
        get "/leases" => v1::list_leases,
        get "/leases/{id}" => v1::get_lease,
        post "/leases" => v1::create_lease,
        patch "/leases/{id}" => v1::patch_lease,
        delete "/leases/{id}" => v1::delete_lease,
    });

    let transaction_routes = routes!(D => {
        get "/transactions" => v1::list_transactions,
        get "/transactions/{id}" => v1::get_transaction,
        post "/transactions" => v1::create_transaction,
        patch "/transactions/{id}" => v1::patch_transaction,
        delete "/transactions/{id}" => v1::delete_transaction,
    });

    let api_v1 = user_routes
        .merge(post_routes)
        .merge(property_routes)
        .merge(unit_routes)
        .merge(ownership_routes)
        .merge(lease_routes)
        .merge(transaction_routes);

    let mut router = system_routes.nest("/api/v1", api_v1);
    if enable_docs {
        router = router.merge(Scalar::with_url("/docs", ApiDoc::openapi()));
    }

    router.with_state(state)
}
