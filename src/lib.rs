pub mod app;
pub mod auth;
pub mod cli;
pub mod commands;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod period;
pub mod progress;
pub mod types;
