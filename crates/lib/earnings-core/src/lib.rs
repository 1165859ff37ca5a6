//! Core services for earnings-mcp.
//!
//! This crate owns fiscal period resolution, metric extraction, the report
//! source abstraction with its Alpha Vantage client, and the control plane
//! that both tool adapters call into.

pub mod control;
pub mod fiscal;
pub mod metrics;
pub mod source;
