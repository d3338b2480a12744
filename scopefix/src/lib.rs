//! Core library for the scopefix line-range patcher.
//!
//! scopefix rewrites one manually identified function body inside a source
//! file: it inserts a scope-release call before every return-style exit in a
//! bounded line window, and can migrate the body from a cloned-context
//! identifier to the shared-context identifier, replacing the clone
//! initialization with a scope-push call.
//!
//! The patcher works on text only. It never parses the host language, and it
//! assumes each exit statement occupies exactly one physical line.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

/// Module defining the command-line interface arguments and structs.
pub mod cli;

/// Module for handling CLI commands and their execution logic.
pub mod commands;

/// Module for loading configuration.
pub mod config;

/// Module containing shared constants and the default patch templates.
pub mod constants;

/// Module defining the entry point logic shared by the binary and tests.
pub mod entry_point;

/// Module for colored CLI output formatting.
pub mod output;

/// Module containing the line-window patching engine.
pub mod patch;
