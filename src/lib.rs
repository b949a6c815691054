//! A branded, browser-like shell around a single embedded web page.

pub mod browser;
pub mod config;
pub mod error;
pub mod host;
