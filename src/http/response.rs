//! HTTP response building module
//!
//! Provides builders for the handful of responses the service sends.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

/// Methods accepted on the form route
pub const ALLOWED_METHODS: &str = "GET, HEAD, POST, OPTIONS";

/// Methods accepted on the health probe routes
pub const HEALTH_METHODS: &str = "GET, HEAD";

/// Build 404 Not Found response
pub fn build_404_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("404 Not Found")))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(Full::new(Bytes::from("404 Not Found")))
        })
}

/// Build 405 Method Not Allowed response advertising `allow`
pub fn build_405_response(allow: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(405)
        .header("Content-Type", "text/plain")
        .header("Allow", allow)
        .body(Full::new(Bytes::from("405 Method Not Allowed")))
        .unwrap_or_else(|e| {
            log_build_error("405", &e);
            Response::new(Full::new(Bytes::from("405 Method Not Allowed")))
        })
}

/// Build OPTIONS response
pub fn build_options_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(204)
        .header("Allow", ALLOWED_METHODS)
        .body(Full::new(Bytes::new()))
        .unwrap_or_else(|e| {
            log_build_error("OPTIONS", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Build 413 Payload Too Large response
pub fn build_413_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(413)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from("413 Payload Too Large")))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            Response::new(Full::new(Bytes::from("413 Payload Too Large")))
        })
}

/// Build 408 Request Timeout response
pub fn build_408_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(408)
        .header("Content-Type", "text/plain")
        .header("Connection", "close")
        .body(Full::new(Bytes::from("408 Request Timeout")))
        .unwrap_or_else(|e| {
            log_build_error("408", &e);
            Response::new(Full::new(Bytes::from("408 Request Timeout")))
        })
}

/// Build 503 Service Unavailable response
pub fn build_503_response() -> Response<Full<Bytes>> {
    Response::builder()
        .status(503)
        .header("Content-Type", "text/plain")
        .header("Connection", "close")
        .body(Full::new(Bytes::from("503 Service Unavailable")))
        .unwrap_or_else(|e| {
            log_build_error("503", &e);
            Response::new(Full::new(Bytes::from("503 Service Unavailable")))
        })
}

/// Build 400 Bad Request response
pub fn build_400_response(message: &str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(400)
        .header("Content-Type", "text/plain")
        .body(Full::new(Bytes::from(format!("400 Bad Request: {message}"))))
        .unwrap_or_else(|e| {
            log_build_error("400", &e);
            Response::new(Full::new(Bytes::from("400 Bad Request")))
        })
}

/// Build plain-text health probe response
pub fn build_health_response(status: &'static str) -> Response<Full<Bytes>> {
    Response::builder()
        .status(200)
        .header("Content-Type", "text/plain")
        .header("Cache-Control", "no-cache")
        .body(Full::new(Bytes::from(status)))
        .unwrap_or_else(|e| {
            log_build_error("health", &e);
            Response::new(Full::new(Bytes::from(status)))
        })
}

/// Build generic HTML response
pub fn build_html_response(content: String, is_head: bool) -> Response<Full<Bytes>> {
    let content_length = content.len();
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(content)
    };

    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .header("Content-Length", content_length)
        .header("Cache-Control", "no-cache")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(Full::new(Bytes::new()))
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_text(response: Response<Full<Bytes>>) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_head_keeps_length_drops_body() {
        let response = build_html_response("<p>hi</p>".to_string(), true);
        assert_eq!(response.status(), 200);
        assert_eq!(response.headers()["Content-Length"], "9");
        assert!(body_text(response).await.is_empty());
    }

    #[tokio::test]
    async fn test_405_lists_allowed_methods() {
        let response = build_405_response(ALLOWED_METHODS);
        assert_eq!(response.status(), 405);
        assert_eq!(response.headers()["Allow"], ALLOWED_METHODS);
        assert_eq!(body_text(response).await, "405 Method Not Allowed");

        let health = build_405_response(HEALTH_METHODS);
        assert_eq!(health.headers()["Allow"], "GET, HEAD");
    }

    #[tokio::test]
    async fn test_timeout_responses_close_connection() {
        let response = build_408_response();
        assert_eq!(response.status(), 408);
        assert_eq!(response.headers()["Connection"], "close");
        assert_eq!(body_text(response).await, "408 Request Timeout");

        let response = build_503_response();
        assert_eq!(response.status(), 503);
        assert_eq!(response.headers()["Connection"], "close");
    }

    #[test]
    fn test_options_has_no_body_status() {
        let response = build_options_response();
        assert_eq!(response.status(), 204);
        assert_eq!(response.headers()["Allow"], ALLOWED_METHODS);
    }
}
