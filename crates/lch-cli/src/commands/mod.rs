//! CLI subcommand implementations.

pub mod check;
pub mod summary;
pub mod upcoming;
pub mod util;
