//! Espyna domain core.
//!
//! Pure building blocks shared by every adapter and surface: the error
//! taxonomy, identifier validation, the authorization and repository ports,
//! the transaction runner, the list-data engine, and the generic CRUD use
//! cases. Nothing in this crate performs I/O on its own.

pub mod auth;
pub mod context;
pub mod entity;
pub mod error;
pub mod listdata;
pub mod messages;
pub mod repository;
pub mod transaction;
pub mod types;
pub mod usecase;
pub mod validation;
