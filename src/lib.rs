//! Airline booking API
//!
//! Customers authenticate with email and password, receive a bearer token,
//! and present it on protected endpoints. Mutations of shared data are
//! limited to admins.

pub mod app;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod extractors;
pub mod middleware;

pub use app::{build_router, AppState};
pub use config::Config;
