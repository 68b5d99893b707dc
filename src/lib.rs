pub mod cli;
pub mod client;
pub mod config;
pub mod dump;
pub mod errors;
pub mod logging;
