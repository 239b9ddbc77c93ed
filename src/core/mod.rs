pub mod app;
pub mod backend;
pub mod cli;
pub mod config;
pub mod confirm;
pub mod generate;
pub mod history;
pub mod kv;
pub mod models;
pub mod paths;
pub mod persistence;
pub mod prompt;
pub mod settings;
pub mod util;
