//! Admin claim management commands.
//!
//! These write the identity directory directly and skip the caller check
//! the callable endpoints perform, so the first admin can be created.
//!
//! # Environment Variables
//!
//! - `FUNCTIONS_DIRECTORY_PATH` - JSON directory file shared with the
//!   functions service

use std::path::{Path, PathBuf};

use faucet_store_core::Email;
use faucet_store_functions::{
    AdminRoster, DirectoryError, DirectoryUser, IdentityDirectory, JsonDirectory,
};
use thiserror::Error;

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Directory could not be read or written.
    #[error("Directory error: {0}")]
    Directory(#[from] DirectoryError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// No user with that email.
    #[error("No user with email {0} in the directory")]
    UserNotFound(String),
}

/// Directory file named by the environment.
///
/// # Errors
///
/// Returns an error if `FUNCTIONS_DIRECTORY_PATH` is unset.
pub fn directory_path() -> Result<PathBuf, CliError> {
    dotenvy::dotenv().ok();
    std::env::var("FUNCTIONS_DIRECTORY_PATH")
        .map(PathBuf::from)
        .map_err(|_| CliError::MissingEnvVar("FUNCTIONS_DIRECTORY_PATH"))
}

/// Grant the admin claim to `email` and record it on the roster.
///
/// # Returns
///
/// The uid of the promoted user.
///
/// # Errors
///
/// Returns an error for a malformed email, an unknown user, or a directory
/// that cannot be read or written.
pub async fn bootstrap(path: &Path, email: &str) -> Result<String, CliError> {
    let email = Email::parse(email)
        .map_err(|_| CliError::InvalidEmail(email.to_owned()))?;

    tracing::info!("Opening directory {}", path.display());
    let directory = JsonDirectory::open(path).await?;

    let user = directory
        .user_by_email(email.as_str())
        .await?
        .ok_or_else(|| CliError::UserNotFound(email.to_string()))?;

    if user.admin {
        tracing::warn!("{} already holds the admin claim", user.email);
    }
    directory.set_admin_claim(&user.uid, true).await?;
    directory.add(&user.email, &user.uid).await?;

    tracing::info!("Admin claim granted! Email: {}, UID: {}", user.email, user.uid);
    Ok(user.uid)
}

/// Every user holding the admin claim.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub async fn list(path: &Path) -> Result<Vec<DirectoryUser>, CliError> {
    let directory = JsonDirectory::open(path).await?;
    Ok(directory.admins().await?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    async fn directory_file(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("directory.json");
        tokio::fs::write(
            &path,
            r#"{"users":[{"uid":"u1","email":"root@example.com"},{"uid":"u2","email":"bob@example.com"}]}"#,
        )
        .await
        .unwrap();
        path
    }

    #[tokio::test]
    async fn test_bootstrap_grants_and_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = directory_file(&dir).await;

        let uid = bootstrap(&path, "Root@Example.com").await.unwrap();
        assert_eq!(uid, "u1");

        let admins = list(&path).await.unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(admins[0].email, "root@example.com");

        let directory = JsonDirectory::open(&path).await.unwrap();
        assert_eq!(directory.roster().await.unwrap().uids, vec!["u1"]);
    }

    #[tokio::test]
    async fn test_bootstrap_unknown_user() {
        let dir = tempfile::tempdir().unwrap();
        let path = directory_file(&dir).await;

        let err = bootstrap(&path, "ghost@example.com").await.unwrap_err();
        assert!(matches!(err, CliError::UserNotFound(_)));
        assert!(list(&path).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bootstrap_rejects_malformed_email() {
        let dir = tempfile::tempdir().unwrap();
        let path = directory_file(&dir).await;
        let err = bootstrap(&path, "not-an-email").await.unwrap_err();
        assert!(matches!(err, CliError::InvalidEmail(_)));
    }
}
