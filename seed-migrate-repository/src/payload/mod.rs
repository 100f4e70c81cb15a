//! Payload CMS implementation of the content store.
//!
//! This module provides:
//! - [`PayloadConfig`] connection settings for the Payload REST API
//! - [`PayloadClient`] the `ContentStore` implementation

mod client;
mod config;

pub use client::PayloadClient;
pub use config::PayloadConfig;
