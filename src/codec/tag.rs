//! Enumerated wire tags.
//!
//! A tag enum serializes as its lower-case name and deserializes by matching
//! the incoming string case-insensitively against the declared tag set. The
//! [`wire_tag!`](crate::codec::tag::wire_tag) macro generates the enum together
//! with its serde, `Display` and `FromStr` impls.

use crate::error::{Error, Result};

/// A closed set of string tags.
pub trait WireTag: Sized + Copy + 'static {
    /// Every declared tag, in declaration order.
    const ALL: &'static [Self];

    /// Human-readable name of the tag set, used in error messages.
    const NAME: &'static str;

    /// The lower-case wire name of this tag.
    fn as_str(&self) -> &'static str;

    /// Case-insensitive lookup of a wire name.
    fn parse_tag(s: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let expected: Vec<&str> = Self::ALL.iter().map(|t| t.as_str()).collect();
                Error::format(format!(
                    "\"{}\" is not a valid {} (expected one of: {})",
                    s,
                    Self::NAME,
                    expected.join(", ")
                ))
            })
    }
}

// Generates: enum (Copy, Eq, Hash), WireTag, Serialize, Deserialize, Display, FromStr.
macro_rules! wire_tag {
    (
        $(#[$attr:meta])*
        pub enum $name:ident : $label:literal {
            $( $(#[$vattr:meta])* $variant:ident => $tag:literal ),+ $(,)?
        }
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vattr])* $variant ),+
        }

        impl $crate::codec::tag::WireTag for $name {
            const ALL: &'static [Self] = &[$( $name::$variant ),+];
            const NAME: &'static str = $label;

            fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $tag ),+
                }
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(
                &self,
                serializer: S,
            ) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str($crate::codec::tag::WireTag::as_str(self))
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(
                deserializer: D,
            ) -> std::result::Result<Self, D::Error> {
                let s = <String as serde::Deserialize>::deserialize(deserializer)?;
                <$name as $crate::codec::tag::WireTag>::parse_tag(&s)
                    .map_err($crate::error::Error::into_de)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::codec::tag::WireTag::as_str(self))
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::Error;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                <$name as $crate::codec::tag::WireTag>::parse_tag(s)
            }
        }
    };
}

pub(crate) use wire_tag;
