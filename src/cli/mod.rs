//! CLI command handlers

pub mod commands;

pub use commands::{basic, convert, currency, graph, loan, scientific};
