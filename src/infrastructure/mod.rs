//! Infrastructure layer providing external service integrations.
//!
//! This module contains the HTTP client for the report service and
//! storage of downloaded report documents.

pub mod client;
pub mod download;

pub use client::*;
pub use download::*;
