//! Error codes shared by the callable endpoints and their clients.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Canonical error code of a failed callable invocation.
///
/// Serialized in the wire form (`PERMISSION_DENIED`), displayed in the
/// short form (`permission-denied`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CallableCode {
    /// The caller lacks the admin privilege claim.
    PermissionDenied,
    /// A required argument is missing or malformed.
    InvalidArgument,
    /// The referenced user does not exist.
    NotFound,
    /// No verified caller identity was supplied.
    Unauthenticated,
    /// The backend failed while handling a valid request.
    Internal,
}

impl CallableCode {
    /// Short kebab-case form, e.g. `permission-denied`.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PermissionDenied => "permission-denied",
            Self::InvalidArgument => "invalid-argument",
            Self::NotFound => "not-found",
            Self::Unauthenticated => "unauthenticated",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for CallableCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_and_display_forms() {
        let code = CallableCode::PermissionDenied;
        assert_eq!(
            serde_json::to_string(&code).unwrap(),
            "\"PERMISSION_DENIED\""
        );
        assert_eq!(code.to_string(), "permission-denied");
        let parsed: CallableCode = serde_json::from_str("\"NOT_FOUND\"").unwrap();
        assert_eq!(parsed, CallableCode::NotFound);
    }
}
