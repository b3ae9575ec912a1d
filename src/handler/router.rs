//! Request routing dispatch module
//!
//! Entry point for HTTP request processing: reads the body within the size
//! limit, routes by path and method, and writes the access log line.

use crate::config::AppState;
use crate::http;
use crate::logger::{self, AccessLogEntry};
use crate::prediction::VisitForm;
use crate::view::{self, Outcome};
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::{Body, Bytes};
use hyper::header::{HeaderValue, SERVER};
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Path of the form page
pub const INDEX_PATH: &str = "/";

/// Response plus what the access log should record about it
struct Routed {
    response: Response<Full<Bytes>>,
    prediction: Option<String>,
}

impl From<Response<Full<Bytes>>> for Routed {
    fn from(response: Response<Full<Bytes>>) -> Self {
        Self {
            response,
            prediction: None,
        }
    }
}

/// Main entry point for HTTP request handling
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    peer_addr: Option<SocketAddr>,
) -> Result<Response<Full<Bytes>>, Infallible>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let mut entry = state.access_log_enabled().then(|| {
        let mut entry = AccessLogEntry::new(peer_addr, method.as_str(), &path);
        entry.http_version = format!("{:?}", req.version())
            .trim_start_matches("HTTP/")
            .to_string();
        entry.referer = header_value(&req, "referer");
        entry.user_agent = header_value(&req, "user-agent");
        entry
    });

    let mut routed = route_request(req, &method, &path, &state).await;
    if let Ok(server_name) = HeaderValue::from_str(&state.config.http.server_name) {
        routed.response.headers_mut().insert(SERVER, server_name);
    }

    if let Some(entry) = entry.as_mut() {
        let body_bytes = routed
            .response
            .body()
            .size_hint()
            .exact()
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(0);
        entry.prediction = routed.prediction;
        entry.finish(routed.response.status().as_u16(), body_bytes, started);
        logger::log_access(entry, &state.config.logging.access_log_format);
    }

    Ok(routed.response)
}

async fn route_request<B>(
    req: Request<B>,
    method: &Method,
    path: &str,
    state: &AppState,
) -> Routed
where
    B: Body,
    B::Error: Into<BoxError>,
{
    let health = &state.config.health;
    if health.enabled && (path == health.liveness_path || path == health.readiness_path) {
        // Artifacts are loaded before the listener exists, so ready == alive
        return match *method {
            Method::GET | Method::HEAD => http::build_health_response("ok").into(),
            _ => http::build_405_response(http::HEALTH_METHODS).into(),
        };
    }

    if path != INDEX_PATH {
        return http::build_404_response().into();
    }

    match *method {
        Method::GET => http::build_html_response(view::render_index(Outcome::Blank), false).into(),
        Method::HEAD => http::build_html_response(view::render_index(Outcome::Blank), true).into(),
        Method::OPTIONS => http::build_options_response().into(),
        Method::POST => match read_body(
            req,
            state.config.http.max_body_size,
            Duration::from_secs(state.config.performance.read_timeout),
        )
        .await
        {
            Ok(body) => serve_prediction(&body, state),
            Err(response) => response.into(),
        },
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            http::build_405_response(http::ALLOWED_METHODS).into()
        }
    }
}

/// Score a submitted form and render the result page
///
/// Request failures are shown on the page rather than as an HTTP error.
fn serve_prediction(body: &[u8], state: &AppState) -> Routed {
    match VisitForm::parse(body).and_then(|form| state.model.predict(&form)) {
        Ok(prediction) => {
            let formatted = prediction.formatted();
            logger::log_debug(&format!(
                "Prediction: log_revenue={:.6} revenue={formatted}",
                prediction.log_revenue
            ));
            Routed {
                response: http::build_html_response(
                    view::render_index(Outcome::Prediction(&formatted)),
                    false,
                ),
                prediction: Some(formatted),
            }
        }
        Err(e) => {
            logger::log_error(&format!("Error processing request: {e}"));
            let message = e.to_string();
            http::build_html_response(view::render_index(Outcome::Error(&message)), false).into()
        }
    }
}

/// Collect the request body, enforcing `max_body_size` and `read_timeout`
async fn read_body<B>(
    req: Request<B>,
    max_body_size: u64,
    read_timeout: Duration,
) -> Result<Bytes, Response<Full<Bytes>>>
where
    B: Body,
    B::Error: Into<BoxError>,
{
    if let Some(resp) = check_body_size(&req, max_body_size) {
        return Err(resp);
    }

    let limit = usize::try_from(max_body_size).unwrap_or(usize::MAX);
    let collected =
        tokio::time::timeout(read_timeout, Limited::new(req.into_body(), limit).collect()).await;
    let Ok(collected) = collected else {
        logger::log_warning(&format!(
            "Request body not received within {} seconds",
            read_timeout.as_secs()
        ));
        return Err(http::build_408_response());
    };
    match collected {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => {
            logger::log_error(&format!(
                "Request body exceeded {max_body_size} bytes while reading"
            ));
            Err(http::build_413_response())
        }
        Err(e) => {
            logger::log_warning(&format!("Failed to read request body: {e}"));
            Err(http::build_400_response("unreadable request body"))
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size<B>(req: &Request<B>, max_body_size: u64) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

fn header_value<B>(req: &Request<B>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::model::artifacts::fixtures;
    use crate::model::ModelArtifacts;
    use crate::prediction::RevenueModel;

    fn state_with(configure: impl FnOnce(&mut Config)) -> Arc<AppState> {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::load_from("does-not-exist/config").unwrap();
        config.logging.access_log = false;
        configure(&mut config);
        let artifacts = ModelArtifacts::load(&fixtures::write_default(dir.path())).unwrap();
        Arc::new(AppState::new(config, RevenueModel::new(artifacts)))
    }

    fn state() -> Arc<AppState> {
        state_with(|_| {})
    }

    fn request(method: &str, path: &str, body: &str) -> Request<Full<Bytes>> {
        Request::builder()
            .method(method)
            .uri(path)
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Full::new(Bytes::from(body.to_string())))
            .unwrap()
    }

    async fn send(state: Arc<AppState>, req: Request<Full<Bytes>>) -> (u16, String) {
        let response = handle_request(req, state, None).await.unwrap();
        let status = response.status().as_u16();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_get_renders_blank_form() {
        let (status, body) = send(state(), request("GET", "/", "")).await;
        assert_eq!(status, 200);
        assert!(body.contains("<select id=\"operatingSystem\" name=\"operatingSystem\">"));
        assert!(body.contains("<option value=\"affiliate\">affiliate</option>"));
        assert!(!body.contains("Predicted revenue"));
        assert!(!body.contains("Error:"));
    }

    #[tokio::test]
    async fn test_post_renders_currency() {
        let form = "hits=20&pageviews=20&visitNumber=1&country=Canada&continent=Americas\
&browser=Chrome&subContinent=Northern+America&operatingSystem=Windows&medium=organic";
        let (status, body) = send(state(), request("POST", "/", form)).await;
        assert_eq!(status, 200);
        assert!(body.contains("<strong>$20.09</strong>"), "{body}");
    }

    #[tokio::test]
    async fn test_post_with_unknown_categories_and_missing_numbers() {
        let form = "country=Atlantis&browser=&medium=carrier+pigeon";
        let (status, body) = send(state(), request("POST", "/", form)).await;
        assert_eq!(status, 200);
        // Unknown browser code 3 gives exp(-3)
        assert!(body.contains("<strong>$0.05</strong>"), "{body}");
    }

    #[tokio::test]
    async fn test_post_with_bad_number_renders_error() {
        let (status, body) = send(state(), request("POST", "/", "hits=lots")).await;
        assert_eq!(status, 200);
        assert!(body.contains("Error: invalid value for hits: &#x27;lots&#x27; is not an integer"));
        assert!(!body.contains("Predicted revenue"));
        assert!(body.contains("<option value=\"Chrome\">Chrome</option>"));
    }

    #[tokio::test]
    async fn test_server_header() {
        let response = handle_request(request("GET", "/", ""), state(), None)
            .await
            .unwrap();
        assert_eq!(response.headers()[SERVER], "revenue-predictor/0.1");
    }

    #[tokio::test]
    async fn test_head_has_no_body() {
        let (status, body) = send(state(), request("HEAD", "/", "")).await;
        assert_eq!(status, 200);
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_405_allow_matches_route() {
        let response = handle_request(request("POST", "/healthz", ""), state(), None)
            .await
            .unwrap();
        assert_eq!(response.status(), 405);
        assert_eq!(response.headers()["Allow"], "GET, HEAD");

        let response = handle_request(request("PUT", "/readyz", ""), state(), None)
            .await
            .unwrap();
        assert_eq!(response.headers()["Allow"], "GET, HEAD");

        let response = handle_request(request("DELETE", "/", ""), state(), None)
            .await
            .unwrap();
        assert_eq!(response.headers()["Allow"], "GET, HEAD, POST, OPTIONS");
    }

    #[tokio::test]
    async fn test_other_routes_and_methods() {
        assert_eq!(send(state(), request("GET", "/predict", "")).await.0, 404);
        assert_eq!(send(state(), request("DELETE", "/", "")).await.0, 405);
        assert_eq!(send(state(), request("OPTIONS", "/", "")).await.0, 204);
    }

    #[tokio::test]
    async fn test_health_probes() {
        assert_eq!(send(state(), request("GET", "/healthz", "")).await, (200, "ok".to_string()));
        assert_eq!(send(state(), request("GET", "/readyz", "")).await.0, 200);
        assert_eq!(send(state(), request("POST", "/healthz", "")).await.0, 405);

        let disabled = state_with(|c| c.health.enabled = false);
        assert_eq!(send(disabled, request("GET", "/healthz", "")).await.0, 404);
    }

    #[tokio::test]
    async fn test_body_limit() {
        let small = state_with(|c| c.http.max_body_size = 8);
        let (status, _) = send(Arc::clone(&small), request("POST", "/", "hits=1234567890")).await;
        assert_eq!(status, 413);

        let mut declared = request("POST", "/", "hits=1");
        declared
            .headers_mut()
            .insert("content-length", "4096".parse().unwrap());
        assert_eq!(send(small, declared).await.0, 413);
    }

    /// Body whose frames never arrive
    struct StalledBody;

    impl Body for StalledBody {
        type Data = Bytes;
        type Error = Infallible;

        fn poll_frame(
            self: std::pin::Pin<&mut Self>,
            _cx: &mut std::task::Context<'_>,
        ) -> std::task::Poll<Option<Result<hyper::body::Frame<Bytes>, Infallible>>> {
            std::task::Poll::Pending
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_body_times_out() {
        let slow = state_with(|c| c.performance.read_timeout = 2);
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .body(StalledBody)
            .unwrap();
        let response = handle_request(req, slow, None).await.unwrap();
        assert_eq!(response.status(), 408);
    }

    #[tokio::test]
    async fn test_access_log_enabled_path() {
        let logged = state_with(|c| c.logging.access_log = true);
        let (status, _) = send(logged, request("POST", "/", "hits=1")).await;
        assert_eq!(status, 200);
    }
}
