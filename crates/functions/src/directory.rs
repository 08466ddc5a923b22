//! Identity directory and admin roster.
//!
//! [`IdentityDirectory`] answers "who is calling" and "who has this email";
//! [`AdminRoster`] is the shared record of current admins. [`JsonDirectory`]
//! implements both over an in-memory document that is optionally persisted
//! to a JSON file after every change.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;

/// Directory storage failure.
#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Directory I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Directory file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// A user known to the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryUser {
    pub uid: String,
    pub email: String,
    /// Id tokens currently issued to this user.
    #[serde(default)]
    pub id_tokens: Vec<String>,
    /// The admin privilege claim.
    #[serde(default)]
    pub admin: bool,
}

impl DirectoryUser {
    #[must_use]
    pub fn new(uid: &str, email: &str) -> Self {
        Self {
            uid: uid.to_owned(),
            email: email.to_owned(),
            id_tokens: Vec::new(),
            admin: false,
        }
    }

    /// Issue an id token to this user.
    #[must_use]
    pub fn with_token(mut self, token: &str) -> Self {
        self.id_tokens.push(token.to_owned());
        self
    }

    #[must_use]
    pub const fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }
}

/// Verified identity of a caller, with its claim as of this request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    pub uid: String,
    pub email: String,
    pub admin: bool,
}

/// The shared admin roster document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default)]
    pub emails: Vec<String>,
    #[serde(default)]
    pub uids: Vec<String>,
}

impl Roster {
    /// Emails are stored normalized and compared case-insensitively.
    fn insert(&mut self, email: &str, uid: &str) {
        let email = normalize(email);
        if !self.emails.iter().any(|e| normalize(e) == email) {
            self.emails.push(email);
        }
        if !self.uids.iter().any(|u| u == uid) {
            self.uids.push(uid.to_owned());
        }
    }

    fn remove(&mut self, email: &str, uid: &str) {
        let email = normalize(email);
        self.emails.retain(|e| normalize(e) != email);
        self.uids.retain(|u| u != uid);
    }
}

/// Lookup and claim management for users.
#[async_trait]
pub trait IdentityDirectory: Send + Sync {
    /// Resolve an id token to its user, if the token is known.
    async fn verify_token(&self, token: &str) -> Result<Option<Caller>, DirectoryError>;

    /// Find a user by email, case-insensitively.
    async fn user_by_email(&self, email: &str) -> Result<Option<DirectoryUser>, DirectoryError>;

    /// Set or clear the admin claim of `uid`.
    async fn set_admin_claim(&self, uid: &str, admin: bool) -> Result<(), DirectoryError>;

    /// Every user holding the admin claim.
    async fn admins(&self) -> Result<Vec<DirectoryUser>, DirectoryError>;
}

/// The shared record of current admins.
#[async_trait]
pub trait AdminRoster: Send + Sync {
    /// Record an admin. Adding an existing entry changes nothing.
    async fn add(&self, email: &str, uid: &str) -> Result<(), DirectoryError>;

    async fn remove(&self, email: &str, uid: &str) -> Result<(), DirectoryError>;

    async fn roster(&self) -> Result<Roster, DirectoryError>;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct DirectoryDocument {
    #[serde(default)]
    users: Vec<DirectoryUser>,
    #[serde(default)]
    roster: Option<Roster>,
}

/// A directory kept in memory and optionally mirrored to a JSON file.
#[derive(Debug)]
pub struct JsonDirectory {
    path: Option<PathBuf>,
    document: RwLock<DirectoryDocument>,
}

pub(crate) fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

impl JsonDirectory {
    /// A directory that is never written to disk.
    #[must_use]
    pub fn in_memory(users: Vec<DirectoryUser>) -> Self {
        Self {
            path: None,
            document: RwLock::new(DirectoryDocument {
                users,
                roster: None,
            }),
        }
    }

    /// Load the directory from `path`; a missing file starts empty.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, DirectoryError> {
        let path = path.as_ref().to_path_buf();
        let document = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "directory file not found, starting empty");
                DirectoryDocument::default()
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Self {
            path: Some(path),
            document: RwLock::new(document),
        })
    }

    async fn persist(&self, document: &DirectoryDocument) -> Result<(), DirectoryError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let bytes = serde_json::to_vec_pretty(document)?;
        tokio::fs::write(path, bytes).await?;
        tracing::debug!(path = %path.display(), "directory saved");
        Ok(())
    }
}

#[async_trait]
impl IdentityDirectory for JsonDirectory {
    async fn verify_token(&self, token: &str) -> Result<Option<Caller>, DirectoryError> {
        let document = self.document.read().await;
        Ok(document
            .users
            .iter()
            .find(|user| user.id_tokens.iter().any(|t| t == token))
            .map(|user| Caller {
                uid: user.uid.clone(),
                email: user.email.clone(),
                admin: user.admin,
            }))
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<DirectoryUser>, DirectoryError> {
        let email = normalize(email);
        let document = self.document.read().await;
        Ok(document
            .users
            .iter()
            .find(|user| normalize(&user.email) == email)
            .cloned())
    }

    async fn set_admin_claim(&self, uid: &str, admin: bool) -> Result<(), DirectoryError> {
        let mut document = self.document.write().await;
        if let Some(user) = document.users.iter_mut().find(|user| user.uid == uid) {
            user.admin = admin;
        }
        self.persist(&document).await
    }

    async fn admins(&self) -> Result<Vec<DirectoryUser>, DirectoryError> {
        let document = self.document.read().await;
        Ok(document
            .users
            .iter()
            .filter(|user| user.admin)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AdminRoster for JsonDirectory {
    async fn add(&self, email: &str, uid: &str) -> Result<(), DirectoryError> {
        let mut document = self.document.write().await;
        document
            .roster
            .get_or_insert_with(Roster::default)
            .insert(email, uid);
        self.persist(&document).await
    }

    async fn remove(&self, email: &str, uid: &str) -> Result<(), DirectoryError> {
        let mut document = self.document.write().await;
        if let Some(roster) = document.roster.as_mut() {
            roster.remove(email, uid);
        }
        self.persist(&document).await
    }

    async fn roster(&self) -> Result<Roster, DirectoryError> {
        Ok(self.document.read().await.roster.clone().unwrap_or_default())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_token_and_email_lookup() {
        let directory = JsonDirectory::in_memory(vec![
            DirectoryUser::new("u1", "Root@Example.com")
                .with_token("tok-root")
                .with_admin(true),
        ]);

        let caller = directory.verify_token("tok-root").await.unwrap().unwrap();
        assert_eq!(caller.uid, "u1");
        assert!(caller.admin);
        assert!(directory.verify_token("forged").await.unwrap().is_none());

        let user = directory
            .user_by_email(" root@example.com ")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(user.uid, "u1");
    }

    #[tokio::test]
    async fn test_roster_is_set_like() {
        let directory = JsonDirectory::in_memory(vec![]);
        directory.add("a@example.com", "u1").await.unwrap();
        directory.add("a@example.com", "u1").await.unwrap();
        directory.add("b@example.com", "u2").await.unwrap();

        let roster = directory.roster().await.unwrap();
        assert_eq!(roster.emails, vec!["a@example.com", "b@example.com"]);
        assert_eq!(roster.uids, vec!["u1", "u2"]);

        directory.remove("a@example.com", "u1").await.unwrap();
        assert_eq!(directory.roster().await.unwrap().emails, vec!["b@example.com"]);
    }

    #[tokio::test]
    async fn test_roster_ignores_email_case() {
        let directory = JsonDirectory::in_memory(vec![]);
        directory.add("Bob@Example.com", "u-bob").await.unwrap();
        directory.add("bob@example.com", "u-bob").await.unwrap();
        assert_eq!(directory.roster().await.unwrap().emails, vec!["bob@example.com"]);

        directory.remove("BOB@example.COM", "u-bob").await.unwrap();
        assert_eq!(directory.roster().await.unwrap(), Roster::default());
    }

    #[tokio::test]
    async fn test_changes_persist_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("directory.json");
        tokio::fs::write(
            &path,
            r#"{"users":[{"uid":"u1","email":"a@example.com"}]}"#,
        )
        .await
        .unwrap();

        let directory = JsonDirectory::open(&path).await.unwrap();
        directory.set_admin_claim("u1", true).await.unwrap();
        directory.add("a@example.com", "u1").await.unwrap();

        let reopened = JsonDirectory::open(&path).await.unwrap();
        let admins = reopened.admins().await.unwrap();
        assert_eq!(admins.len(), 1);
        assert_eq!(reopened.roster().await.unwrap().uids, vec!["u1"]);
    }

    #[tokio::test]
    async fn test_missing_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let directory = JsonDirectory::open(dir.path().join("absent.json"))
            .await
            .unwrap();
        assert!(directory.admins().await.unwrap().is_empty());
        assert_eq!(directory.roster().await.unwrap(), Roster::default());
    }
}
