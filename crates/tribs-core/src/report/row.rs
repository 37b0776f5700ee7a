use crate::model::ElementType;
use serde::{Deserialize, Serialize};

/// One line of the seismic weight report.
///
/// Serialized with the report's column headings as keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Element Type")]
    pub element_type: ElementType,
    #[serde(rename = "Element Label")]
    pub element_label: String,
    /// ft
    #[serde(rename = "Height")]
    pub height: f64,
    /// psf
    #[serde(rename = "Weight")]
    pub weight: f64,
    /// psf
    #[serde(rename = "Snow Weight")]
    pub snow_weight: f64,
    /// ft
    #[serde(rename = "Length")]
    pub length: f64,
    /// sf
    #[serde(rename = "Area")]
    pub area: f64,
    /// lb
    #[serde(rename = "Total Weight")]
    pub total_weight: f64,
}

impl ReportRow {
    pub fn is_empty(&self) -> bool {
        self.length == 0.0 && self.area == 0.0
    }
}
