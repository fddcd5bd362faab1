mod import;
mod zone;

pub use import::{parse_import_row, ZoneImportRow};
pub use zone::{like_pattern, UserSummary, Zone, ZoneWithOwner, ZONE_COLUMNS};
