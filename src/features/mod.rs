pub mod auth;
pub mod duplicates;
pub mod families;
pub mod statistics;
pub mod sync;
pub mod users;
pub mod zones;
