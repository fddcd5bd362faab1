mod filter;

pub use filter::BirthYearFilter;
