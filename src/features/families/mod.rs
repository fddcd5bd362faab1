//! Household registry: families, members and the two intake channels.
//!
//! Every family created through intake gets a "target person" member that
//! mirrors its root person, written in the same transaction as the family.

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::FamilyService;
