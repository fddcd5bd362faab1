mod province;
mod user;

pub use province::Province;
pub use user::{User, UserWithProvince};
