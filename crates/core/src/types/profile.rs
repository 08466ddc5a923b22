//! Shopper profile stored in the document store, keyed by user id.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fields a profile must have before checkout can proceed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProfileField {
    Name,
    Phone,
    Address,
    City,
}

impl ProfileField {
    /// The required set, in form order.
    pub const REQUIRED: [Self; 4] = [Self::Name, Self::Phone, Self::Address, Self::City];

    /// Form label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Name => "Full name",
            Self::Phone => "Phone",
            Self::Address => "Address",
            Self::City => "City",
        }
    }
}

impl fmt::Display for ProfileField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shipping and contact details for a user.
///
/// Every field is optional at rest because the store may hold partially
/// filled profiles; [`Profile::missing_required`] decides completeness.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub additional_info: Option<String>,
}

impl Profile {
    /// Value of a required field, `None` when absent or blank.
    #[must_use]
    pub fn field(&self, field: ProfileField) -> Option<&str> {
        let value = match field {
            ProfileField::Name => self.name.as_deref(),
            ProfileField::Phone => self.phone.as_deref(),
            ProfileField::Address => self.address.as_deref(),
            ProfileField::City => self.city.as_deref(),
        };
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    /// Required fields that are absent or blank.
    #[must_use]
    pub fn missing_required(&self) -> Vec<ProfileField> {
        ProfileField::REQUIRED
            .into_iter()
            .filter(|field| self.field(*field).is_none())
            .collect()
    }

    /// Whether all required fields are present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.missing_required().is_empty()
    }
}
