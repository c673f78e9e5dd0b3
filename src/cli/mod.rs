//! Command-line front end: file I/O and JSON encoding around the converter

pub mod commands;
pub mod config;
pub mod error;
