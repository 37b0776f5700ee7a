use crate::model::ElementType;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TribsError {
    #[error("PDF read failed: {0}")]
    Pdf(String),

    #[error("page index {index} out of range (document has {page_count} page(s))")]
    PageOutOfRange { index: usize, page_count: usize },

    #[error("invalid scale '{input}': {reason}")]
    ScaleParse { input: String, reason: String },

    #[error("weight criteria section {section}: '{line}' sets a value before any R:/F:/W: label")]
    CriteriaKeyWithoutLabel { section: usize, line: String },

    #[error("weight criteria section {section}: invalid value in '{line}': {reason}")]
    CriteriaValue {
        section: usize,
        line: String,
        reason: String,
    },

    #[error("page {page}: invalid SCALE annotation: {reason}")]
    InvalidCalibration { page: usize, reason: String },

    #[error("page {page}: annotation '{subject}' has an odd number ({count}) of coordinate values")]
    InvalidCoordinates {
        page: usize,
        subject: String,
        count: usize,
    },

    #[error("{element_type} '{label}' has invalid geometry: {reason}")]
    InvalidGeometry {
        element_type: ElementType,
        label: String,
        reason: String,
    },

    #[error("duplicate {element_type} label '{label}' on the same page")]
    DuplicateLabel {
        element_type: ElementType,
        label: String,
    },

    #[error("no weight criteria for {element_type} '{label}'")]
    MissingCriteria {
        element_type: ElementType,
        label: String,
    },

    #[error("weight criteria for {element_type} '{label}' is missing '{parameter}'")]
    MissingParameter {
        element_type: ElementType,
        label: String,
        parameter: &'static str,
    },

    #[error("page {page} has tributary areas but no weight criteria annotation")]
    MissingCriteriaBlock { page: usize },

    #[error("failed to load options from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
