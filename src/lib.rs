//! Stockroom inventory service library
//!
//! Categories and products over MySQL, with monetary amounts exposed in major units
//! and stored as integer cents.

pub mod config;
pub mod core;
pub mod middleware;
pub mod modules;
pub mod startup;
pub mod storage;
pub mod telemetry;

// Re-export commonly used types
pub use modules::categories;
pub use modules::products;
pub use startup::AppServices;
