//! Newtype IDs for type-safe entity references.
//!
//! The backend hands out opaque string identifiers. Use the `define_id!`
//! macro to wrap them so a plan ID can never be passed where a category ID
//! is expected.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `PartialOrd`, `Ord`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use hostdeck_core::define_id;
/// define_id!(ServerId);
/// define_id!(RegionId);
///
/// let server = ServerId::new("srv-1");
/// let region = RegionId::new("srv-1");
///
/// // These are different types, so this won't compile:
/// // let _: ServerId = region;
/// assert_eq!(server.as_str(), region.as_str());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying identifier.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.pad(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(CategoryId);
define_id!(PlanId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_transparently() {
        let id = CategoryId::new("cat-7");
        assert_eq!(serde_json::to_string(&id).ok().as_deref(), Some("\"cat-7\""));

        let parsed: PlanId = serde_json::from_str("\"plan-1\"").unwrap_or_else(|_| PlanId::new(""));
        assert_eq!(parsed.as_str(), "plan-1");
    }

    #[test]
    fn test_ids_honor_width_and_alignment() {
        assert_eq!(format!("{:<6}|", PlanId::new("42")), "42    |");
        assert_eq!(format!("{:>5}", CategoryId::new("c1")), "   c1");
        assert_eq!(format!("{:.3}", PlanId::new("plan-9")), "pla");
    }

    #[test]
    fn test_ids_order_lexically() {
        let mut ids = vec![CategoryId::new("b"), CategoryId::new("a")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "a");
    }
}
