mod claims;
pub mod extractors;
