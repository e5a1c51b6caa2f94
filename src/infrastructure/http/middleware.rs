//! HTTP Middleware
//!
//! HTTP 状态码错误日志中间件

use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};

/// HTTP 状态码错误日志中间件
///
/// 当状态码为 4xx 或 5xx 时记录请求方法和 URI，
/// 错误详情已在 `ApiError::into_response()` 中记录
pub async fn error_logging_middleware(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();

    let response = next.run(request).await;
    let status = response.status();

    if status.is_server_error() {
        tracing::error!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP server error"
        );
    } else if status.is_client_error() {
        tracing::warn!(
            method = %method,
            uri = %uri,
            status = %status.as_u16(),
            "HTTP client error"
        );
    }

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        routing::{get, post},
        Router,
    };
    use tower::util::ServiceExt;

    use crate::infrastructure::http::error::ApiError;

    async fn ok_handler() -> &'static str {
        "OK"
    }

    async fn missing_site() -> Result<&'static str, ApiError> {
        Err(ApiError::NotFound("Site not found: ghost".to_string()))
    }

    async fn store_busy() -> Result<&'static str, ApiError> {
        Err(ApiError::ServiceUnavailable("database is locked".to_string()))
    }

    fn create_test_router() -> Router {
        Router::new()
            .route("/ok", get(ok_handler))
            .route("/WebsiteStart", post(missing_site))
            .route("/GetWebSiteList", get(store_busy))
            .layer(axum::middleware::from_fn(error_logging_middleware))
    }

    async fn status_of(method: &str, uri: &str) -> StatusCode {
        let request = HttpRequest::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        create_test_router()
            .oneshot(request)
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_ok_response_passes_through() {
        assert_eq!(status_of("GET", "/ok").await, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_client_error_passes_through() {
        assert_eq!(
            status_of("POST", "/WebsiteStart?siteName=ghost").await,
            StatusCode::NOT_FOUND
        );
        // 方法不匹配
        assert_eq!(
            status_of("GET", "/WebsiteStart").await,
            StatusCode::METHOD_NOT_ALLOWED
        );
    }

    #[tokio::test]
    async fn test_server_error_passes_through() {
        assert_eq!(
            status_of("GET", "/GetWebSiteList").await,
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
