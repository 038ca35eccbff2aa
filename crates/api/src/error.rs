//! Transport error translator
//!
//! Every handler returns [`ApiError`]. Turning it into a response writes the
//! fixed envelope
//!
//! ```json
//! {"error": {"code": "NOT_FOUND", "message": "...", "metadata": {...}}}
//! ```
//!
//! with the error's HTTP status, and parks the error in the response
//! extensions. The [`report`] middleware picks it up there and logs it once,
//! enriched with the request method, path and id.
//!
//! Values at `Error` severity or above never leak their message or
//! metadata to the client; the full cause and stack go to the log only.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::Json;
use axum::extract::Request;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use devshare_error::{BoxError, Error, ErrorCode, Severity, domain};
use http::StatusCode;
use serde::Serialize;
use serde_json::Value;

use crate::middleware::RequestId;

/// Client-facing message for server-side failures
pub const INTERNAL_MESSAGE: &str = "internal server error";

/// Result type for handlers
pub type ApiResult<T> = Result<T, ApiError>;

/// An [`Error`] on its way out of a handler
#[derive(Debug)]
pub struct ApiError(pub Error);

impl ApiError {
    /// Translate any failure. Rich values pass through untouched; anything
    /// else becomes a generic internal failure.
    pub fn normalize(err: impl Into<BoxError>) -> Self {
        Self(Error::normalize(err.into()))
    }

    pub const fn inner(&self) -> &Error {
        &self.0
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(domain::invalid_input("body", rejection.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self(domain::invalid_input("path", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(domain::invalid_input("query", rejection.body_text()))
    }
}

#[derive(Debug, Serialize)]
struct Envelope<'a> {
    error: Body<'a>,
}

#[derive(Debug, Serialize)]
struct Body<'a> {
    code: ErrorCode,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    metadata: Option<&'a BTreeMap<String, Value>>,
}

impl<'a> Body<'a> {
    fn of(err: &'a Error) -> Self {
        if err.severity() >= Severity::Error {
            return Self {
                code: err.code(),
                message: INTERNAL_MESSAGE,
                metadata: None,
            };
        }

        Self {
            code: err.code(),
            message: err.message(),
            metadata: Some(err.metadata()).filter(|m| !m.is_empty()),
        }
    }
}

/// Marker left in response extensions for [`report`]
#[derive(Debug, Clone)]
pub struct Reported(pub Arc<Error>);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let mut response = (
            status,
            Json(Envelope {
                error: Body::of(&err),
            }),
        )
            .into_response();
        response.extensions_mut().insert(Reported(Arc::new(err)));
        response
    }
}

/// Request facts attached to every error log line
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: String,
    pub path: String,
    pub request_id: Option<String>,
}

impl RequestContext {
    fn of(req: &Request) -> Self {
        Self {
            method: req.method().to_string(),
            path: req.uri().path().to_string(),
            request_id: req.extensions().get::<RequestId>().map(|id| id.0.clone()),
        }
    }
}

/// Middleware logging the error behind any failed response.
pub async fn report(req: Request, next: Next) -> Response {
    let ctx = RequestContext::of(&req);
    let mut response = next.run(req).await;

    if let Some(Reported(err)) = response.extensions_mut().remove::<Reported>() {
        log_error(&err, &ctx);
    }
    response
}

macro_rules! emit {
    ($level:ident, $err:expr, $ctx:expr, $msg:literal $(, $extra:ident = $value:expr)?) => {{
        let err: &Error = $err;
        let ctx: &RequestContext = $ctx;
        let metadata = Value::Object(err.metadata_cloned().into_iter().collect());
        tracing::$level!(
            method = %ctx.method,
            path = %ctx.path,
            request_id = ctx.request_id.as_deref().unwrap_or(""),
            status = err.http_status(),
            code = %err.code(),
            severity = %err.severity(),
            error = %err.message(),
            metadata = %metadata,
            cause = %err.cause().map(ToString::to_string).unwrap_or_default(),
            stack = %format_stack(err),
            $($extra = $value,)?
            $msg
        )
    }};
}

/// Log one error at the level its severity calls for.
pub fn log_error(err: &Error, ctx: &RequestContext) {
    match err.severity() {
        Severity::Debug => emit!(debug, err, ctx, "request error"),
        Severity::Info => emit!(info, err, ctx, "request error"),
        Severity::Warning => emit!(warn, err, ctx, "request error"),
        Severity::Error => emit!(error, err, ctx, "request error"),
        Severity::Critical => {
            emit!(error, err, ctx, "CRITICAL request error", critical = true);
        }
    }
}

fn format_stack(err: &Error) -> String {
    err.stack_trace()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    async fn render(err: Error) -> (StatusCode, Value, Option<Reported>) {
        let mut response = ApiError(err).into_response();
        let status = response.status();
        let reported = response.extensions_mut().remove::<Reported>();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap(), reported)
    }

    #[tokio::test]
    async fn test_warning_keeps_message_and_metadata() {
        let (status, body, reported) = render(domain::not_found("Workspace", "42")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body,
            json!({
                "error": {
                    "code": "NOT_FOUND",
                    "message": "Workspace not found: 42",
                    "metadata": {"entity_type": "Workspace", "entity_id": "42"}
                }
            })
        );
        assert!(reported.is_some());
    }

    #[tokio::test]
    async fn test_empty_metadata_is_omitted() {
        let (status, body, _) = render(domain::err_conflict()).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(
            body,
            json!({"error": {"code": "CONFLICT", "message": "entity already exists"}})
        );
    }

    #[tokio::test]
    async fn test_unauthorized_carries_reason() {
        let (status, body, _) = render(domain::unauthorized("token expired")).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            json!({
                "error": {
                    "code": "UNAUTHORIZED",
                    "message": "unauthorized: token expired",
                    "metadata": {"reason": "token expired"}
                }
            })
        );
    }

    #[tokio::test]
    async fn test_server_errors_hide_details() {
        let err = Error::coded(ErrorCode::Database, "connection reset by peer")
            .with_metadata("pg_code", "08006");
        let (status, body, reported) = render(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"error": {"code": "DATABASE_ERROR", "message": INTERNAL_MESSAGE}})
        );
        let Reported(kept) = reported.unwrap();
        assert_eq!(kept.message(), "connection reset by peer");
        assert!(!kept.stack_trace().is_empty());
    }

    #[tokio::test]
    async fn test_critical_uses_overridden_status() {
        let err = Error::coded(ErrorCode::Database, "pool exhausted")
            .with_http_status(503)
            .with_severity(Severity::Critical);
        let (status, body, _) = render(err).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["message"], INTERNAL_MESSAGE);
        assert!(body["error"].get("metadata").is_none());
    }

    #[tokio::test]
    async fn test_foreign_errors_become_internal() {
        let io = std::io::Error::other("disk on fire");
        let ApiError(err) = ApiError::normalize(io);

        assert_eq!(err.code(), ErrorCode::Internal);
        assert_eq!(err.http_status(), 500);
        assert_eq!(err.severity(), Severity::Error);

        let rich = ApiError::normalize(domain::err_conflict());
        assert_eq!(rich.inner().code(), ErrorCode::Conflict);
    }

    #[test]
    fn test_log_error_every_severity() {
        let ctx = RequestContext {
            method: "GET".to_string(),
            path: "/health".to_string(),
            request_id: Some("req-1".to_string()),
        };
        for severity in [
            Severity::Debug,
            Severity::Info,
            Severity::Warning,
            Severity::Error,
            Severity::Critical,
        ] {
            let err = Error::coded(ErrorCode::Internal, "boom").with_severity(severity);
            log_error(&err, &ctx);
        }
    }
}
