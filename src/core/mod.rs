//! Core types shared across the codebase.

mod env;
mod state;

pub use env::BuildEnv;
pub use state::{Phase, enter, is_shutdown, register_server, setup_shutdown_handler};
