//! Command implementations for xsteps-cli

pub mod cmake;
pub mod list;

pub use cmake::{run_config_set, run_config_show, run_execute, run_install};
pub use list::run_list;
