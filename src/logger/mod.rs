//! Logger module
//!
//! Provides logging utilities for the prediction server including:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;
pub use writer::Level;

use crate::config::Config;
use crate::model::ModelArtifacts;
use chrono::Local;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    let level = config
        .logging
        .level
        .parse::<Level>()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;
    writer::init(
        level,
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

fn line(level: Level, message: &str) -> String {
    let tag = match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
    };
    format!("{} [{tag}] {message}", Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
}

fn write(level: Level, message: &str) {
    if let Some(writer) = writer::get() {
        if writer.enabled(level) {
            writer.write(level, &line(level, message));
        }
    } else if level <= Level::Warn {
        eprintln!("{}", line(level, message));
    } else {
        println!("{}", line(level, message));
    }
}

pub fn log_info(message: &str) {
    write(Level::Info, message);
}

pub fn log_debug(message: &str) {
    write(Level::Debug, message);
}

pub fn log_error(message: &str) {
    write(Level::Error, message);
}

pub fn log_warning(message: &str) {
    write(Level::Warn, message);
}

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    log_info("======================================");
    log_info("Revenue prediction server started");
    log_info(&format!("Listening on: http://{addr}"));
    log_info(&format!("Log level: {}", config.logging.level));
    if let Some(workers) = config.server.workers {
        log_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        log_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        log_info(&format!("Error log: {path}"));
    }
    if config.health.enabled {
        log_info(&format!(
            "Health probes: {} {}",
            config.health.liveness_path, config.health.readiness_path
        ));
    }
    log_info("======================================");
}

pub fn log_artifacts_loaded(artifacts: &ModelArtifacts) {
    log_info(&format!(
        "Model loaded: {} features, {} encoders",
        artifacts.feature_names.len(),
        artifacts.encoders.len()
    ));
    for (feature, encoder) in &artifacts.encoders {
        log_debug(&format!(
            "Encoder '{feature}': {} classes",
            encoder.classes().len()
        ));
    }
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    log_debug(&format!("[Connection] Accepted from: {peer_addr}"));
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    log_error(&format!("Failed to serve connection: {err:?}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    let message = entry.format(format);
    match writer::get() {
        Some(writer) => writer.write_access(&message),
        None => println!("{message}"),
    }
}

pub fn log_shutdown_requested(active: usize) {
    log_info(&format!(
        "[Shutdown] Stopped accepting connections, {active} still active"
    ));
}

pub fn log_shutdown_complete(remaining: usize) {
    if remaining == 0 {
        log_info("[Shutdown] All connections closed");
    } else {
        log_warning(&format!(
            "[Shutdown] Grace period elapsed with {remaining} connections still open"
        ));
    }
}
