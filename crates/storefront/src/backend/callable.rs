//! HTTP client for the callable functions service.
//!
//! Requests are `POST {base}/{name}` with a `{"data": ...}` body and the
//! session's id token as a bearer credential. Responses carry either
//! `{"result": ...}` or `{"error": {"status": ..., "message": ...}}`.

use async_trait::async_trait;
use faucet_store_core::CallableCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use super::{AdminFunctions, BackendError, BackendErrorKind, IdToken};

#[derive(Serialize)]
struct CallableRequest<T> {
    data: T,
}

#[derive(Serialize)]
struct EmailArgs<'a> {
    email: &'a str,
}

#[derive(Deserialize)]
struct CallableErrorBody {
    status: CallableCode,
    message: String,
}

#[derive(Deserialize)]
struct CallableResponse<T> {
    result: Option<T>,
    error: Option<CallableErrorBody>,
}

#[derive(Deserialize)]
struct MessageResult {
    message: String,
}

#[derive(Deserialize)]
struct AdminsResult {
    admins: Vec<String>,
}

/// Client for the admin role endpoints.
#[derive(Clone)]
pub struct CallableClient {
    client: reqwest::Client,
    base_url: Url,
}

impl CallableClient {
    /// Create a client for the service rooted at `base_url`.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn endpoint(&self, name: &str) -> Result<Url, BackendError> {
        let mut base = self.base_url.clone();
        if !base.path().ends_with('/') {
            base.set_path(&format!("{}/", base.path()));
        }
        base.join(name)
            .map_err(|e| BackendError::unavailable(format!("invalid functions URL: {e}")))
    }

    /// Invoke a callable function and decode its result.
    async fn call<A, R>(&self, name: &str, caller: &IdToken, data: A) -> Result<R, BackendError>
    where
        A: Serialize + Send,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.endpoint(name)?)
            .bearer_auth(caller.expose())
            .json(&CallableRequest { data })
            .send()
            .await
            .map_err(|e| BackendError::unavailable(format!("{name} request failed: {e}")))?;

        let status = response.status();
        let body: CallableResponse<R> = response.json().await.map_err(|e| {
            BackendError::unavailable(format!("{name} returned an unreadable body ({status}): {e}"))
        })?;

        match (body.result, body.error) {
            (_, Some(error)) => Err(BackendError::new(
                BackendErrorKind::from(error.status),
                error.message,
            )),
            (Some(result), None) => Ok(result),
            (None, None) => Err(BackendError::unavailable(format!(
                "{name} returned neither result nor error ({status})"
            ))),
        }
    }
}

#[async_trait]
impl AdminFunctions for CallableClient {
    #[instrument(skip(self, caller))]
    async fn add_admin_role(&self, caller: &IdToken, email: &str) -> Result<String, BackendError> {
        let result: MessageResult = self
            .call("addAdminRole", caller, EmailArgs { email })
            .await?;
        Ok(result.message)
    }

    #[instrument(skip(self, caller))]
    async fn remove_admin_role(
        &self,
        caller: &IdToken,
        email: &str,
    ) -> Result<String, BackendError> {
        let result: MessageResult = self
            .call("removeAdminRole", caller, EmailArgs { email })
            .await?;
        Ok(result.message)
    }

    #[instrument(skip(self, caller))]
    async fn list_admins(&self, caller: &IdToken) -> Result<Vec<String>, BackendError> {
        let result: AdminsResult = self
            .call("listAdmins", caller, serde_json::json!({}))
            .await?;
        Ok(result.admins)
    }
}
