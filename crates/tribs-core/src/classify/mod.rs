pub mod elements;

pub use elements::{classify, parse_subject, ClassifiedPage, DuplicatePolicy};
