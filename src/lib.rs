pub mod cli;
pub mod commands;
pub mod config;
pub mod utils;

pub use cli::cli;
