//! Closure-report CLI library.

mod cli;
pub mod commands;

pub use cli::{Cli, Commands};
