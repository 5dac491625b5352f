pub mod health;

use axum::routing::post;
use axum::Router;
use espyna_core::entity::Entity;
use espyna_db::models::{Client, Payment, Product, Subscription, Workflow};

use crate::handlers::entity;
use crate::services::{Services, UseCasesFor};
use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Every entity gets the same operations, all POST:
///
/// ```text
/// /{domain}/{resource}/create
/// /{domain}/{resource}/read
/// /{domain}/{resource}/update
/// /{domain}/{resource}/delete
/// /{domain}/{resource}/list
/// /{domain}/{resource}/get-list-page-data
/// ```
///
/// Mounted resources: `entity/client`, `product/product`,
/// `subscription/subscription`, `payment/payment`, `workflow/workflow`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(entity_router::<Client>())
        .merge(entity_router::<Product>())
        .merge(entity_router::<Subscription>())
        .merge(entity_router::<Payment>())
        .merge(entity_router::<Workflow>())
}

/// The operation routes for one entity, under `/{domain}/{resource}`.
pub fn entity_router<E>() -> Router<AppState>
where
    E: Entity,
    Services: UseCasesFor<E>,
{
    let operations = Router::new()
        .route("/create", post(entity::create::<E>))
        .route("/read", post(entity::read::<E>))
        .route("/update", post(entity::update::<E>))
        .route("/delete", post(entity::delete::<E>))
        .route("/list", post(entity::list::<E>))
        .route("/get-list-page-data", post(entity::get_list_page_data::<E>));

    Router::new().nest(&format!("/{}/{}", E::DOMAIN, E::RESOURCE), operations)
}
