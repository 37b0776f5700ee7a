pub mod engine;
pub mod geometry;
pub mod outcome;

pub use engine::compute_intersections;
pub use outcome::{AreaOutline, IntersectionAnalysis, IntersectionRecord, IntersectionShape};
