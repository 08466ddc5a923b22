//! Signed-in session identity.

use serde::{Deserialize, Serialize};

use super::{Email, UserId};

/// The identity returned by the authentication provider on sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionUser {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub avatar: Option<String>,
}
