pub mod list;
pub mod remove;
