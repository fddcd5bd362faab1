mod family_handler;
pub(crate) mod intake;
mod member_handler;

pub use family_handler::*;
pub use member_handler::*;
