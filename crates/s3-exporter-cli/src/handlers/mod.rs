//! HTTP request handlers

pub mod discovery;
pub mod index;
pub mod metrics;
pub mod probe;

pub use discovery::*;
pub use index::*;
pub use metrics::*;
pub use probe::*;
