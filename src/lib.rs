pub mod api_connection;
pub mod cli;
pub mod config;
pub mod data_loader;
pub mod errors;
pub mod expiry;
pub mod label_reader;
pub mod logging;
pub mod models;
pub mod recipe_catalog;
pub mod recipe_engine;
pub mod reminders;
pub mod store;
