//! CLI utilities for chardev.
//!
//! This crate provides configuration and output helpers for the `chardev`
//! command line tool.

pub mod config;
pub mod output;

pub use config::{Config, Context, load_config};
pub use output::{Output, OutputFormat, print_verbose};
