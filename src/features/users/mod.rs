//! User accounts and provinces.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/provinces` | Seeded provinces (public) |
//! | POST | `/api/users` | Create an account in the caller's scope |
//! | GET | `/api/users` | Accounts visible to the caller |
//! | GET | `/api/users/{id}` | One account |
//! | DELETE | `/api/users/{id}` | Delete an account (zones cascade) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{ProvisionOutcome, UserService};
