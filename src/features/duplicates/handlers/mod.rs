mod duplicate_handler;

pub use duplicate_handler::*;
