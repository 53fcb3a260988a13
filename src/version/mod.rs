//! Version discovery layer
//!
//! This module provides the core functionality for fetching the release
//! index, extracting version tokens from it, comparing versions, and
//! persisting the result of each check.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Source    │────▶│   Scanner   │────▶│ Comparator  │
//! │  (fetch)    │     │  (extract)  │     │  (order)    │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                                                │
//!                                                ▼
//!                     ┌─────────────┐     ┌─────────────┐
//!                     │    Store    │◀────│    Token    │
//!                     │ (settings)  │     │ (normalize) │
//!                     └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`token`]: Fixed-width numeric version tokens
//! - [`comparator`]: The shared version ordering
//! - [`scanner`]: Regex extraction and latest-version selection
//! - [`source`]: Trait for fetching the release index page
//! - [`sources`]: HTTP implementation of the page source
//! - [`store`]: SQLite-backed settings repository
//! - [`types`]: Persisted record and patch types
//! - [`error`]: Error types for fetch, store and settings operations

pub mod comparator;
pub mod error;
pub mod scanner;
pub mod source;
pub mod sources;
pub mod store;
pub mod token;
pub mod types;
