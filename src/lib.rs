//! groceries - Shopping List Library
//!
//! This library provides the core functionality for the groceries CLI,
//! a shopping list kept in a single SQLite file.
//!
//! # Core Concepts
//!
//! - **Items**: grocery entries with a planned/purchased status
//! - **Filters**: case-insensitive name search plus a category selection
//! - **Actions**: add, check/uncheck and delete, shared by CLI and UI
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `groceries.toml`
//! - `error`: Error types and result aliases
//! - `task`: Item, status and filter types
//! - `storage`: SQLite persistence for items
//! - `actions`: Mutations with user-facing outcomes
//! - `actor`: Author resolution for new items
//! - `output`: Human and JSON command output
//! - `ui`: Interactive terminal view

pub mod actions;
pub mod actor;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod storage;
pub mod task;
pub mod ui;

pub use error::{Error, Result};
