//! Synchronization tracker.
//!
//! A family is created with `is_synced = false` and flips to true only
//! through a force sync by its creator. Member edits never reset the flag.

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::SyncService;
