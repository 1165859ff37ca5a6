//! MCP tool modules.
//!
//! Each tool renders its result as a pretty-printed JSON document, so errors
//! reach the caller as content rather than protocol failures.

pub mod earnings;
