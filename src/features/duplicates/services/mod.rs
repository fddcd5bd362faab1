mod duplicate_service;

pub use duplicate_service::DuplicateService;
