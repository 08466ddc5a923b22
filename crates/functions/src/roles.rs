//! Admin role management.
//!
//! The caller's claim is read from the directory on every call; nothing the
//! client asserts about itself is trusted. Role changes check, in order:
//! the caller is an admin, an email was given, the target user exists.

use std::sync::Arc;

use tracing::instrument;

use crate::directory::{AdminRoster, Caller, IdentityDirectory, normalize};
use crate::error::{CallableError, Result};

const NOT_ADMIN: &str = "The function must be called by an admin.";

/// Grants, revokes and lists the admin claim.
#[derive(Clone)]
pub struct AdminRoles {
    directory: Arc<dyn IdentityDirectory>,
    roster: Arc<dyn AdminRoster>,
}

impl AdminRoles {
    #[must_use]
    pub fn new(directory: Arc<dyn IdentityDirectory>, roster: Arc<dyn AdminRoster>) -> Self {
        Self { directory, roster }
    }

    /// Resolve a bearer token to a caller. Unknown tokens yield `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory fails.
    pub async fn caller(&self, token: Option<&str>) -> Result<Option<Caller>> {
        let Some(token) = token else {
            return Ok(None);
        };
        Ok(self.directory.verify_token(token).await?)
    }

    fn require_admin(caller: Option<&Caller>) -> Result<&Caller> {
        match caller {
            Some(caller) if caller.admin => Ok(caller),
            Some(caller) => {
                tracing::warn!(uid = %caller.uid, "non-admin called an admin function");
                Err(CallableError::PermissionDenied(NOT_ADMIN.to_owned()))
            }
            None => Err(CallableError::PermissionDenied(NOT_ADMIN.to_owned())),
        }
    }

    /// The directory's normalized email and uid for `email`.
    async fn target(&self, email: Option<&str>) -> Result<(String, String)> {
        let email = email
            .map(str::trim)
            .filter(|email| !email.is_empty())
            .ok_or_else(|| CallableError::InvalidArgument("Email required.".to_owned()))?;
        let user = self
            .directory
            .user_by_email(email)
            .await?
            .ok_or_else(|| CallableError::NotFound("User not found.".to_owned()))?;
        Ok((normalize(&user.email), user.uid))
    }

    /// Give the admin claim to the user with `email`.
    ///
    /// # Errors
    ///
    /// Returns permission-denied, invalid-argument or not-found, checked in
    /// that order, or an internal error if the directory fails.
    #[instrument(skip(self, caller), fields(caller = caller.map(|c| c.uid.as_str())))]
    pub async fn add_admin_role(&self, caller: Option<&Caller>, email: Option<&str>) -> Result<String> {
        Self::require_admin(caller)?;
        let (email, uid) = self.target(email).await?;
        self.directory.set_admin_claim(&uid, true).await?;
        self.roster.add(&email, &uid).await?;
        tracing::info!(%email, %uid, "admin role granted");
        Ok(format!("Success! {email} is now an admin."))
    }

    /// Take the admin claim from the user with `email`.
    ///
    /// # Errors
    ///
    /// Same order as [`AdminRoles::add_admin_role`].
    #[instrument(skip(self, caller), fields(caller = caller.map(|c| c.uid.as_str())))]
    pub async fn remove_admin_role(
        &self,
        caller: Option<&Caller>,
        email: Option<&str>,
    ) -> Result<String> {
        Self::require_admin(caller)?;
        let (email, uid) = self.target(email).await?;
        self.directory.set_admin_claim(&uid, false).await?;
        self.roster.remove(&email, &uid).await?;
        tracing::info!(%email, %uid, "admin role revoked");
        Ok(format!("Success! {email} is no longer an admin."))
    }

    /// Emails on the admin roster.
    ///
    /// # Errors
    ///
    /// Returns permission-denied for a non-admin caller, or an internal
    /// error if the roster cannot be read.
    pub async fn list_admins(&self, caller: Option<&Caller>) -> Result<Vec<String>> {
        Self::require_admin(caller)?;
        Ok(self.roster.roster().await?.emails)
    }
}
