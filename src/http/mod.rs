//! HTTP protocol layer module
//!
//! Response builders shared by the request handler, decoupled from the
//! prediction logic.

pub mod response;

// Re-export commonly used builders
pub use response::{
    build_400_response, build_404_response, build_405_response, build_408_response,
    build_413_response, build_503_response, build_health_response, build_html_response,
    build_options_response, ALLOWED_METHODS, HEALTH_METHODS,
};
