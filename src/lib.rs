pub mod app;
pub mod config;
pub mod db;
pub mod models;
pub mod planning;
pub mod store;
pub mod telemetry;
pub mod ui;
