//! Server module for MCP components
//!
//! This module contains the macro-based MCP server and its parameter models.

pub mod macro_backend;
pub mod models;

pub use macro_backend::HelvarMcpServer;
pub use models::GroupId;
