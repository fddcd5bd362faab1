//! Aggregate statistics, derived on every request.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::StatisticsService;
