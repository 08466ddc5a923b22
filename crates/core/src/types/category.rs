//! Product categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when a category slug is not part of the catalog.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown category: {0}")]
pub struct CategoryError(pub String);

/// The closed set of catalog categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Kitchen,
    Bathroom,
    Shower,
    Accessories,
}

impl Category {
    /// Every category, in navigation order.
    pub const ALL: [Self; 4] = [Self::Kitchen, Self::Bathroom, Self::Shower, Self::Accessories];

    /// URL slug, as used in `/products/{slug}`.
    #[must_use]
    pub const fn slug(&self) -> &'static str {
        match self {
            Self::Kitchen => "kitchen",
            Self::Bathroom => "bathroom",
            Self::Shower => "shower",
            Self::Accessories => "accessories",
        }
    }

    /// Display label for headings and breadcrumbs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Kitchen => "Kitchen Faucets",
            Self::Bathroom => "Bathroom Faucets",
            Self::Shower => "Shower Systems",
            Self::Accessories => "Accessories",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Category {
    type Err = CategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.slug() == s)
            .ok_or_else(|| CategoryError(s.to_owned()))
    }
}
