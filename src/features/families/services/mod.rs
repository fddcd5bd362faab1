mod family_service;

pub use family_service::FamilyService;
