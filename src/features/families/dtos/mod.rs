mod family_dto;
mod member_dto;

pub use family_dto::*;
pub use member_dto::*;
