//! Command handlers for CLI subcommands
//!
//! This module contains the implementation logic for each CLI subcommand.

mod check;
mod convert;
mod types;
mod utils;

pub use check::handle_check;
pub use convert::handle_convert;
pub use types::handle_types;
