// Library interface for chronoscope
// The query and layout engine shared by the terminal UI and the print commands

pub mod config;
pub mod dataset;
pub mod event;
pub mod filter;
pub mod record;
pub mod session;
pub mod table;
pub mod timeline;
pub mod viewport;
pub mod year_range;
