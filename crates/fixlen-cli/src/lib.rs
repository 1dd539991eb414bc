//! Command-line front end for fixed-width record files.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
