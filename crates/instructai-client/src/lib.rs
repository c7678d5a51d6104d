//! instructai-client — service integrations.
//!
//! Implements the `AssessmentService` trait over HTTP/JSON and as an offline
//! mock, plus the configuration that picks between them.

pub mod config;
pub mod http;
pub mod mock;

pub use config::{create_service, load_config_from, InstructConfig};
pub use http::HttpService;
pub use mock::MockService;
