//! Check cycle orchestration
//!
//! This module runs update checks and connects them to their triggers and
//! outputs.
//!
//! # Modules
//!
//! - [`engine`]: The fetch → scan → decide → persist state machine
//! - [`notifier`]: Update notification and badge output
//! - [`scheduler`]: Named periodic trigger and the watch loop
//! - [`settings`]: Validation of user-entered settings

pub mod engine;
pub mod notifier;
pub mod scheduler;
pub mod settings;
