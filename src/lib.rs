pub mod app;
pub mod auth;
pub mod cleaner;
pub mod config;
pub mod error;
mod middleware;
pub mod model;
pub mod repository;
pub mod routes;
mod shutdown;
pub mod state;
mod tracing;
pub mod upload;
