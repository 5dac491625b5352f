//! Lifecycle status enums, serialized as lowercase strings.

use serde::{Deserialize, Serialize};

/// Define a string-backed status enum with `as_str`, `Display` and
/// `FromStr`. The first variant is the default.
macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $first:ident = $first_val:literal
            $(, $variant:ident = $val:literal )* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            #[default]
            #[serde(rename = $first_val)]
            $first,
            $( #[serde(rename = $val)] $variant ),*
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$name::$first $(, $name::$variant)*];

            pub fn as_str(self) -> &'static str {
                match self {
                    $name::$first => $first_val,
                    $( $name::$variant => $val ),*
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                $name::ALL
                    .iter()
                    .copied()
                    .find(|status| status.as_str() == s)
                    .ok_or_else(|| format!("unknown {} '{s}'", stringify!($name)))
            }
        }
    };
}

define_status_enum! {
    /// Subscription lifecycle.
    SubscriptionStatus {
        Trial = "trial",
        Active = "active",
        Paused = "paused",
        Cancelled = "cancelled",
    }
}

define_status_enum! {
    PaymentStatus {
        Pending = "pending",
        Completed = "completed",
        Failed = "failed",
        Refunded = "refunded",
    }
}

define_status_enum! {
    /// Workflow definition lifecycle. Only published workflows run.
    WorkflowStatus {
        Draft = "draft",
        Published = "published",
        Archived = "archived",
    }
}
