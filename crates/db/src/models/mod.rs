//! Entity records persisted by every database provider.
//!
//! Each submodule contains one `Serialize + Deserialize + Validate` struct
//! and its [`Entity`](espyna_core::entity::Entity) implementation. Status
//! enums live in [`status`].

/// Implement [`Entity`](espyna_core::entity::Entity) for a record with the
/// standard `id` / `active` / `date_created` / `date_modified` fields.
macro_rules! impl_entity {
    (
        $ty:ident {
            kind: $kind:literal,
            domain: $domain:literal,
            resource: $resource:literal,
            search: [$($field:literal),+ $(,)?] $(,)?
        }
    ) => {
        impl espyna_core::entity::Entity for $ty {
            const KIND: &'static str = $kind;
            const DOMAIN: &'static str = $domain;
            const RESOURCE: &'static str = $resource;
            const SEARCH_FIELDS: &'static [&'static str] = &[$($field),+];

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }

            fn is_active(&self) -> bool {
                self.active
            }

            fn set_active(&mut self, active: bool) {
                self.active = active;
            }

            fn date_created(&self) -> Option<espyna_core::types::Timestamp> {
                self.date_created
            }

            fn set_date_created(&mut self, at: espyna_core::types::Timestamp) {
                self.date_created = Some(at);
            }

            fn set_date_modified(&mut self, at: espyna_core::types::Timestamp) {
                self.date_modified = Some(at);
            }
        }
    };
}

pub mod client;
pub mod payment;
pub mod product;
pub mod status;
pub mod subscription;
pub mod workflow;

pub use client::Client;
pub use payment::Payment;
pub use product::Product;
pub use subscription::Subscription;
pub use workflow::Workflow;

use validator::ValidationError;

/// ISO 4217 style currency code: three ASCII uppercase letters.
pub(crate) fn validate_currency(value: &str) -> Result<(), ValidationError> {
    if value.len() == 3 && value.chars().all(|c| c.is_ascii_uppercase()) {
        Ok(())
    } else {
        Err(ValidationError::new("currency"))
    }
}
