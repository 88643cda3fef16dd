//! Newtype IDs for catalog records.
//!
//! Record ids are opaque strings. Seeded and imported records keep whatever
//! id they arrived with (`"type-a"`, `"c1"`), while records created in the
//! editor get a fresh UUID so an id is never handed out twice.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Constructors: `new()`, `generate()`
/// - Accessors: `as_str()`, `is_blank()`
/// - `From<String>`, `From<&str>`, `Into<String>` and `Display`
///
/// # Example
///
/// ```rust
/// # use showcase_core::define_id;
/// define_id!(TagId);
/// define_id!(AuthorId);
///
/// let tag = TagId::new("featured");
/// let author = AuthorId::generate();
///
/// assert_eq!(tag.as_str(), "featured");
/// assert!(!author.is_blank());
///
/// // These are different types, so this won't compile:
/// // let _: TagId = author;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing id value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Allocate a fresh, never-before-used id.
            #[must_use]
            pub fn generate() -> Self {
                Self($crate::types::id::generate_id())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Whether the id is empty or whitespace only.
            #[must_use]
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

/// Produce a new random id string.
///
/// Used by [`define_id!`]; callers should prefer `SomeId::generate()`.
#[must_use]
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

define_id!(ProductId);
define_id!(CaseStudyId);
