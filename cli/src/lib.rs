//! CLI utilities for kata.
//!
//! Contexts, directory layout, output formatting and input loading shared by
//! the `kata` binary.

pub mod config;
pub mod output;
pub mod paths;
pub mod request;

pub use config::{API_KEY_ENV, Config, Context, load_config, mask_api_key};
pub use output::{Output, OutputFormat};
pub use paths::Paths;
pub use request::{RequestError, load_request, read_input};
