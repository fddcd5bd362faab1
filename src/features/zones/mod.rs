//! Zone assignment registry.
//!
//! Zones are opaque geometry blobs owned by one user. Deleting the user
//! deletes their zones.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/zones` | Assign a zone to a user |
//! | GET | `/api/zones` | List zones (`?user_id=` filter) |
//! | PUT | `/api/zones/{id}` | Replace a zone's geometry |
//! | POST | `/api/zones/import` | Bulk import from CSV/XLSX |
//! | POST | `/api/zones/import/rows` | Bulk import from JSON rows |
//! | GET | `/api/zones/users/search` | Username search for the picker |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::ZoneService;
