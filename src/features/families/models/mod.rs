mod family;
mod photo;

pub use family::{Family, Member, SubmissionChannel, FAMILY_COLUMNS, MEMBER_COLUMNS};
pub use photo::{photo_filename, PhotoUpload};
