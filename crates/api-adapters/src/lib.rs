//! # api-adapters
//!
//! The HTTP surface of the board. DTOs are framework-neutral; the axum
//! router lives behind the `web-axum` feature.

pub mod dto;

#[cfg(feature = "web-axum")]
pub mod web;
