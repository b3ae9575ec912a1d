//! Request handler module
//!
//! Routes requests to the form page, the prediction flow and the health
//! probes.

pub mod router;

// Re-export main entry point
pub use router::handle_request;
