//! NJ Public Library Data Explorer
//!
//! Loads one annual-report spreadsheet per year, unifies them into a single
//! table and serves the snapshot, history, compare, rank and discovery views.

pub mod charts;
pub mod config;
pub mod data;
pub mod error;
pub mod gui;
pub mod logging;
pub mod stats;
pub mod views;

pub use error::{ExplorerError, Result};
