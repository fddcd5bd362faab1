/// Default page size for pagination
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Maximum page size allowed
pub const MAX_PAGE_SIZE: i64 = 200;

// =============================================================================
// HOUSEHOLD REGISTRY
// =============================================================================

/// Role label of the member row synthesized from a family's root person
pub const TARGET_PERSON_ROLE: &str = "target person";

/// City counted by the overview dashboard when no city is requested
pub const DEFAULT_OVERVIEW_CITY: &str = "Libreville";

/// Provinces inserted by `seed-provinces`
pub const SEED_PROVINCES: [&str; 9] = [
    "Estuaire",
    "Haut-Ogooué",
    "Moyen-Ogooué",
    "Ngounié",
    "Nyanga",
    "Ogooué-Ivindo",
    "Ogooué-Lolo",
    "Ogooué-Maritime",
    "Woleu-Ntem",
];

// =============================================================================
// UPLOAD LIMITS
// =============================================================================

/// Largest accepted family photo (5MB)
pub const MAX_PHOTO_SIZE: usize = 5 * 1024 * 1024;

/// Largest accepted zone import spreadsheet (10MB)
pub const MAX_IMPORT_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Photo content types accepted at intake
pub const ALLOWED_PHOTO_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/webp"];
