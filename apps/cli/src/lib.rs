//! Marketbrief command line driver.
//!
//! Looks up the fixed watchlist once, one instrument at a time, and prints
//! the latest session of each to stdout.

pub mod config;
pub mod render;
pub mod report;
pub mod watchlist;

mod main_lib;

pub use main_lib::{build_fetcher, build_normalizer, init_tracing, run};
