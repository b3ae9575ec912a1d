// Connection handling module
// Accepts a single TCP connection and serves it over HTTP/1

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use std::convert::Infallible;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::signal::SignalHandler;
use crate::config;
use crate::handler;
use crate::http;
use crate::logger;

/// Accept and process a connection, checking limits and logging.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
/// * `signals` - Shutdown coordination
pub fn accept_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: &Arc<config::AppState>,
    conn_counter: &Arc<AtomicUsize>,
    signals: &Arc<SignalHandler>,
) {
    // Increment counter first, then check limit (prevents race condition)
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            // Exceeded limit: rollback counter and reject
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);

    handle_connection(
        stream,
        peer_addr,
        Arc::clone(state),
        Arc::clone(conn_counter),
        signals,
    );
}

/// Handle a single connection in a spawned local task.
///
/// Waiting for a request head is bounded by `keep_alive_timeout` (or
/// `read_timeout` when keep-alive is off). Each request must be answered
/// within `read_timeout + write_timeout`. Once shutdown is requested the
/// connection finishes its in-flight request and closes.
fn handle_connection(
    stream: tokio::net::TcpStream,
    peer_addr: std::net::SocketAddr,
    state: Arc<config::AppState>,
    conn_counter: Arc<AtomicUsize>,
    signals: &Arc<SignalHandler>,
) {
    let mut shutdown = signals.subscribe();

    tokio::task::spawn_local(async move {
        let io = TokioIo::new(stream);

        let performance = &state.config.performance;
        let keep_alive = performance.keep_alive_timeout > 0;
        let header_timeout = Duration::from_secs(if keep_alive {
            performance.keep_alive_timeout
        } else {
            performance.read_timeout
        });
        let request_deadline = Duration::from_secs(
            performance
                .read_timeout
                .saturating_add(performance.write_timeout),
        );

        let mut builder = http1::Builder::new();
        builder
            .timer(TokioTimer::new())
            .keep_alive(keep_alive)
            .header_read_timeout(header_timeout);

        let service_state = Arc::clone(&state);
        let conn = builder.serve_connection(
            io,
            service_fn(move |req| {
                let handled =
                    handler::handle_request(req, Arc::clone(&service_state), Some(peer_addr));
                async move {
                    match tokio::time::timeout(request_deadline, handled).await {
                        Ok(result) => result,
                        Err(_) => {
                            logger::log_warning(&format!(
                                "Request from {peer_addr} not answered within {} seconds",
                                request_deadline.as_secs()
                            ));
                            Ok::<_, Infallible>(http::build_503_response())
                        }
                    }
                }
            }),
        );
        tokio::pin!(conn);

        let serve = async {
            let mut draining = false;
            loop {
                tokio::select! {
                    result = conn.as_mut() => break result,
                    _ = shutdown.wait_for(|&stop| stop), if !draining => {
                        draining = true;
                        conn.as_mut().graceful_shutdown();
                    }
                }
            }
        };

        match serve.await {
            Ok(()) => {}
            Err(err) if err.is_timeout() => {
                logger::log_warning(&format!(
                    "Connection from {peer_addr} idle for {} seconds, closing",
                    header_timeout.as_secs()
                ));
            }
            Err(err) => logger::log_connection_error(&err),
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
