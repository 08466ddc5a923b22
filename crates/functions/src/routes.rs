//! HTTP surface of the callable functions.
//!
//! | Method | Path | Body `data` | `result` |
//! |---|---|---|---|
//! | POST | `/addAdminRole` | `{email}` | `{message}` |
//! | POST | `/removeAdminRole` | `{email}` | `{message}` |
//! | POST | `/listAdmins` | `{}` | `{admins}` |
//! | GET | `/health` | | `ok` |

use axum::{
    Json, Router,
    extract::{FromRequestParts, State, rejection::JsonRejection},
    http::{header, request::Parts},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use crate::directory::Caller;
use crate::error::{CallableError, Result};
use crate::state::AppState;

/// Bearer credential from the `Authorization` header, if any.
pub struct BearerToken(pub Option<String>);

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = CallableError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        let Some(value) = parts.headers.get(header::AUTHORIZATION) else {
            return Ok(Self(None));
        };
        let malformed = || CallableError::Unauthenticated("Malformed Authorization header.".to_owned());
        let token = value
            .to_str()
            .map_err(|_| malformed())?
            .strip_prefix("Bearer ")
            .ok_or_else(malformed)?
            .trim();
        Ok(Self((!token.is_empty()).then(|| token.to_owned())))
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CallableRequest<T: Default> {
    data: T,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EmailArgs {
    email: Option<String>,
}

#[derive(Debug, Serialize)]
struct CallableResult<T> {
    result: T,
}

#[derive(Debug, Serialize)]
struct MessageResult {
    message: String,
}

#[derive(Debug, Serialize)]
struct AdminsResult {
    admins: Vec<String>,
}

/// Arguments of a callable request. An unreadable body counts as no
/// arguments, so the caller check still runs first.
fn arguments<T: Default>(body: std::result::Result<Json<CallableRequest<T>>, JsonRejection>) -> T {
    match body {
        Ok(Json(request)) => request.data,
        Err(rejection) => {
            tracing::debug!(error = %rejection.body_text(), "unreadable callable body");
            T::default()
        }
    }
}

async fn resolve(state: &AppState, token: BearerToken) -> Result<Option<Caller>> {
    state.roles().caller(token.0.as_deref()).await
}

async fn add_admin_role(
    State(state): State<AppState>,
    token: BearerToken,
    body: std::result::Result<Json<CallableRequest<EmailArgs>>, JsonRejection>,
) -> Result<Json<CallableResult<MessageResult>>> {
    let caller = resolve(&state, token).await?;
    let args = arguments(body);
    let message = state
        .roles()
        .add_admin_role(caller.as_ref(), args.email.as_deref())
        .await?;
    Ok(Json(CallableResult {
        result: MessageResult { message },
    }))
}

async fn remove_admin_role(
    State(state): State<AppState>,
    token: BearerToken,
    body: std::result::Result<Json<CallableRequest<EmailArgs>>, JsonRejection>,
) -> Result<Json<CallableResult<MessageResult>>> {
    let caller = resolve(&state, token).await?;
    let args = arguments(body);
    let message = state
        .roles()
        .remove_admin_role(caller.as_ref(), args.email.as_deref())
        .await?;
    Ok(Json(CallableResult {
        result: MessageResult { message },
    }))
}

async fn list_admins(
    State(state): State<AppState>,
    token: BearerToken,
) -> Result<Json<CallableResult<AdminsResult>>> {
    let caller = resolve(&state, token).await?;
    let admins = state.roles().list_admins(caller.as_ref()).await?;
    Ok(Json(CallableResult {
        result: AdminsResult { admins },
    }))
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Build the functions router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/addAdminRole", post(add_admin_role))
        .route("/removeAdminRole", post(remove_admin_role))
        .route("/listAdmins", post(list_admins))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::directory::{AdminRoster, DirectoryUser, JsonDirectory};

    fn app() -> (Router, Arc<JsonDirectory>) {
        let directory = Arc::new(JsonDirectory::in_memory(vec![
            DirectoryUser::new("u-root", "root@example.com")
                .with_token("tok-root")
                .with_admin(true),
            DirectoryUser::new("u-bob", "bob@example.com").with_token("tok-bob"),
        ]));
        let router = routes().with_state(AppState::from_directory(directory.clone()));
        (router, directory)
    }

    fn call(path: &str, token: Option<&str>, body: &str) -> Request<Body> {
        let mut request = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        request.body(Body::from(body.to_owned())).unwrap()
    }

    async fn json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_admin_can_grant() {
        let (app, directory) = app();
        let response = app
            .oneshot(call(
                "/addAdminRole",
                Some("tok-root"),
                r#"{"data":{"email":"bob@example.com"}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json(response).await;
        assert_eq!(
            body["result"]["message"],
            "Success! bob@example.com is now an admin."
        );
        assert_eq!(
            directory.roster().await.unwrap().emails,
            vec!["bob@example.com"]
        );
    }

    #[tokio::test]
    async fn test_non_admin_is_denied() {
        let (app, directory) = app();
        let response = app
            .oneshot(call(
                "/addAdminRole",
                Some("tok-bob"),
                r#"{"data":{"email":"bob@example.com"}}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = json(response).await;
        assert_eq!(body["error"]["status"], "PERMISSION_DENIED");
        assert!(directory.roster().await.unwrap().emails.is_empty());
    }

    #[tokio::test]
    async fn test_missing_email_is_invalid() {
        let (app, _) = app();
        let response = app
            .oneshot(call("/removeAdminRole", Some("tok-root"), r#"{"data":{}}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(response).await["error"]["message"], "Email required.");
    }

    #[tokio::test]
    async fn test_unreadable_body_from_non_admin_is_denied() {
        let (app, _) = app();
        let response = app
            .oneshot(call("/addAdminRole", Some("tok-bob"), "not json"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_malformed_authorization_is_unauthenticated() {
        let (app, _) = app();
        let request = Request::builder()
            .method("POST")
            .uri("/listAdmins")
            .header(header::AUTHORIZATION, "Basic cm9vdA==")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_list_admins() {
        let (app, directory) = app();
        directory.add("root@example.com", "u-root").await.unwrap();

        let response = app
            .oneshot(call("/listAdmins", Some("tok-root"), r#"{"data":{}}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json(response).await["result"]["admins"],
            serde_json::json!(["root@example.com"])
        );
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _) = app();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
