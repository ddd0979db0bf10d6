pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod network;
pub mod services;
pub mod state;
pub mod store;
pub mod validation;
