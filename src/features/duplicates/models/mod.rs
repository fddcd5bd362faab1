mod duplicate;

pub use duplicate::{
    group_duplicates, split_keep_first, DuplicateCandidate, DuplicateGroup, DuplicateKey,
};
