//! Duplicate detection across all members.
//!
//! Two members are duplicates when first and last name match
//! case-insensitively and the birth date text matches exactly.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/duplicates` | Groups with more than one member |
//! | POST | `/api/duplicates/resolve` | Keep the earliest member of a group |
//! | DELETE | `/api/duplicates/members/{member_id}` | Remove one member |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::DuplicateService;
