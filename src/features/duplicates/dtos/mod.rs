mod duplicate_dto;

pub use duplicate_dto::*;
