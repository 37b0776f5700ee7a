//! Parsers for the two free-text formats found in drawing annotations:
//! the calibration label on the `SCALE` line and the weight criteria block.

pub mod criteria;
pub mod scale;

pub use criteria::parse_weight_criteria;
pub use scale::parse_scale_inches;
