//! Expense Ledger - personal expense tracking with budgets and reports
//!
//! This library provides the core functionality for a multi-user expense
//! ledger backed by SQLite. Users log expenses with an optional category, set
//! spending limits per category over a date window, and export filtered views
//! of their ledger as inline text, CSV or a single-page PDF.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (expenses, budgets, report records)
//! - `storage`: SQLite storage layer and schema management
//! - `services`: Business logic spanning repositories (budget status)
//! - `reports`: Report generation, aggregation and provenance
//! - `export`: Text, CSV and PDF emitters
//! - `transport`: Where report files are stored
//! - `i18n`: Message translation
//! - `cli`: Command handlers for the `ledger` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_ledger::config::{LedgerPaths, Settings};
//! use expense_ledger::storage::Storage;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::open(&paths)?;
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod i18n;
pub mod models;
pub mod reports;
pub mod services;
pub mod storage;
pub mod transport;

pub use error::{LedgerError, LedgerResult};
