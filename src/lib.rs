pub mod cli;
pub mod config;
pub mod confirm;
pub mod error;
pub mod export;
pub mod format;
pub mod http;
pub mod listing;
pub mod maintenance;
pub mod remove;
