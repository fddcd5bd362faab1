pub mod access;
pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod routes;
pub mod services;

pub use model::{AuthenticatedUser, Role};
pub use services::{AuthService, TokenService};
