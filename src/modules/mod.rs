//! Infrastructure adapters for external collaborators: photo storage and
//! spreadsheet parsing.

pub mod storage;
pub mod tabular;
