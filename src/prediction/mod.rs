//! Prediction module
//!
//! Form parsing, the static option lists, feature row construction and the
//! revenue model wrapper used by the request handler.

pub mod error;
pub mod features;
pub mod form;
pub mod options;
pub mod service;

pub use form::VisitForm;
pub use options::{SelectField, SELECT_FIELDS};
pub use service::RevenueModel;
