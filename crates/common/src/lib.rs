//! HUMAN Security real-time data submodule for header-bidding hosts.
//!
//! The submodule validates its config, injects HUMAN's anti-fraud script,
//! stores the enrichment data the script reports back and merges it into
//! each auction's `ortb2` fragments.
//!
//! # Modules
//!
//! - [`constants`]: Shared names and attribute keys
//! - [`error`]: Error types and error handling utilities
//! - [`integrations`]: The HUMAN Security provider
//! - [`loader`]: Script loading capability consumed by providers
//! - [`merge`]: Deep merge of JSON objects
//! - [`page`]: Page capabilities (hostname, host global, script handles)
//! - [`rtd`]: Host contract for real-time data submodules
//! - [`script_injector`]: Script injection into served HTML
//! - [`settings`]: Configuration management and validation
//! - [`test_support`]: Testing utilities and mocks

pub mod constants;
pub mod error;
pub mod integrations;
pub mod loader;
pub mod merge;
pub mod page;
pub mod rtd;
pub mod script_injector;
pub mod settings;
