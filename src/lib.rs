pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod grocery;
pub mod llm;
pub mod meals;
pub mod plans;
pub mod state;
