pub mod catalog;
pub mod commands;
pub mod config;
pub mod constants;
pub mod db;
pub mod diff;
pub mod error;
pub mod migration;
pub mod progress;
pub mod prompts;
pub mod render;
pub mod schema_loader;
