//! Newtype wrappers for domain identifiers.
//!
//! Every entity uses a serial integer primary key; the wire format is the bare integer.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

macro_rules! serial_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub i32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(s.parse()?))
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }
    };
}

serial_id!(
    /// Identifies a user account.
    UserId
);
serial_id!(
    /// Identifies a recipe.
    RecipeId
);
serial_id!(
    /// Identifies a tag.
    TagId
);
serial_id!(
    /// Identifies an ingredient in the reference catalog.
    IngredientId
);
