// Server loop module
// Accepts connections until shutdown, then waits for in-flight ones

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config;
use crate::logger;

/// Interval between active-connection checks while draining
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accept connections until shutdown is requested, then drain.
///
/// Must run inside a `LocalSet`: connections are served on local tasks.
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<config::AppState>,
    active_connections: Arc<AtomicUsize>,
    signals: Arc<SignalHandler>,
) {
    let mut shutdown = signals.subscribe();

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            &signals,
                        );
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = shutdown.wait_for(|&stop| stop) => break,
        }
    }

    // Stop accepting before waiting on the remaining connections
    drop(listener);
    logger::log_shutdown_requested(active_connections.load(Ordering::SeqCst));

    let grace = Duration::from_secs(state.config.performance.shutdown_timeout);
    let remaining = wait_for_drain(&active_connections, grace).await;
    logger::log_shutdown_complete(remaining);
}

/// Wait until no connections are active or `grace` elapses.
/// Returns the number of connections still open.
async fn wait_for_drain(active_connections: &AtomicUsize, grace: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace;
    loop {
        let active = active_connections.load(Ordering::SeqCst);
        if active == 0 || tokio::time::Instant::now() >= deadline {
            return active;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AppState, Config};
    use crate::model::artifacts::fixtures;
    use crate::model::ModelArtifacts;
    use crate::prediction::RevenueModel;
    use crate::server::create_reusable_listener;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    #[tokio::test(start_paused = true)]
    async fn test_drain_returns_when_idle() {
        let active = AtomicUsize::new(0);
        assert_eq!(wait_for_drain(&active, Duration::from_secs(5)).await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drain_gives_up_after_grace() {
        let active = AtomicUsize::new(2);
        assert_eq!(wait_for_drain(&active, Duration::from_secs(1)).await, 2);
    }

    fn state_with(configure: impl FnOnce(&mut Config)) -> Arc<AppState> {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::load_from("does-not-exist/config").unwrap();
        config.logging.access_log = false;
        configure(&mut config);
        let artifacts = ModelArtifacts::load(&fixtures::write_default(dir.path())).unwrap();
        Arc::new(AppState::new(config, RevenueModel::new(artifacts)))
    }

    #[tokio::test]
    async fn test_serves_form_then_shuts_down() {
        let state = state_with(|_| {});

        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let signals = Arc::new(SignalHandler::new());
        let active = Arc::new(AtomicUsize::new(0));

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let server = tokio::task::spawn_local(start_server_loop(
                    listener,
                    state,
                    Arc::clone(&active),
                    Arc::clone(&signals),
                ));

                let body = "hits=20&pageviews=20&browser=Chrome";
                let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
                let request = format!(
                    "POST / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
Content-Type: application/x-www-form-urlencoded\r\nContent-Length: {}\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(request.as_bytes()).await.unwrap();
                let mut response = String::new();
                stream.read_to_string(&mut response).await.unwrap();
                assert!(response.starts_with("HTTP/1.1 200 OK"));
                assert!(response.contains("<strong>$20.09</strong>"));

                signals.trigger();
                server.await.unwrap();
            })
            .await;

        assert_eq!(active.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rejects_connections_over_limit() {
        let state = state_with(|c| c.performance.max_connections = Some(0));
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let signals = Arc::new(SignalHandler::new());
        let active = Arc::new(AtomicUsize::new(0));

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let server = tokio::task::spawn_local(start_server_loop(
                    listener,
                    state,
                    Arc::clone(&active),
                    Arc::clone(&signals),
                ));

                let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
                // The write may race the close; only the read outcome matters
                let _ = stream.write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n").await;
                let mut response = Vec::new();
                let read = tokio::time::timeout(
                    Duration::from_secs(5),
                    stream.read_to_end(&mut response),
                )
                .await
                .expect("server should close rejected connection");
                assert!(read.is_err() || response.is_empty());
                assert_eq!(active.load(Ordering::SeqCst), 0);

                signals.trigger();
                server.await.unwrap();
            })
            .await;

        assert_eq!(active.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_incomplete_request_head_times_out() {
        let state = state_with(|c| c.performance.keep_alive_timeout = 1);
        let listener = create_reusable_listener("127.0.0.1:0".parse().unwrap()).unwrap();
        let addr = listener.local_addr().unwrap();
        let signals = Arc::new(SignalHandler::new());
        let active = Arc::new(AtomicUsize::new(0));

        let local = tokio::task::LocalSet::new();
        local
            .run_until(async {
                let server = tokio::task::spawn_local(start_server_loop(
                    listener,
                    state,
                    Arc::clone(&active),
                    Arc::clone(&signals),
                ));

                let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
                stream
                    .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\n")
                    .await
                    .unwrap();
                let mut response = Vec::new();
                let read = tokio::time::timeout(
                    Duration::from_secs(10),
                    stream.read_to_end(&mut response),
                )
                .await
                .expect("server should drop a connection stuck in the request head");
                if read.is_ok() {
                    let text = String::from_utf8_lossy(&response);
                    assert!(text.is_empty() || text.starts_with("HTTP/1.1 408"), "{text}");
                }

                signals.trigger();
                server.await.unwrap();
            })
            .await;

        assert_eq!(active.load(Ordering::SeqCst), 0);
    }
}
