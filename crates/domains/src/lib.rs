//! # domains
//!
//! The central domain model and interface definitions for the message board.

pub mod errors;
pub mod models;
pub mod ports;
pub mod time;

// Re-exporting for easier access in other crates
pub use errors::*;
pub use models::*;
pub use ports::*;
