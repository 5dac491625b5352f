//! Espyna HTTP surface.
//!
//! Exposes every entity's use cases as `POST /api/{domain}/{resource}/{operation}`
//! over axum, with the request context taken from headers.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod services;
pub mod state;
