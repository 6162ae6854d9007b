pub mod cli;
pub mod config;
pub mod core;
pub mod exit;
pub mod input;
pub mod logging;
pub mod report;
pub mod tui;
pub mod ui;
pub mod view;
