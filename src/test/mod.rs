mod config;
pub mod utils;
