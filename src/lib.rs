//! HelvarNet MCP Server
//!
//! Exposes a HelvarNet DALI lighting router to language-model agents as MCP
//! tools: device and fleet overviews with health and brightness filters,
//! group scene recall, and router information.
//!
//! The router itself is reached through the [`router::HelvarRouter`] trait. The
//! crate ships an in-process [`router::SimulatedRouter`] that serves an
//! installation snapshot; a mock router is available behind `test-utils`.

// Core modules
pub mod config;
pub mod error;
pub mod logging;
pub mod router;
pub mod server;
pub mod tools;

// Test support modules - available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

// Re-export main types for convenience
pub use config::ServerConfig;
pub use error::{HelvarError, Result};
pub use router::HelvarRouter;
pub use server::HelvarMcpServer;
