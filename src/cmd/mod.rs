pub mod config;
pub mod print;
