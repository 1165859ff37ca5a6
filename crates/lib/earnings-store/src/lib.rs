//! Report and result models for earnings-mcp.
//!
//! This crate defines the data model shared by the report source, the metric
//! control plane, and both tool adapters.

pub mod models;
pub mod schema;

pub use models::*;
