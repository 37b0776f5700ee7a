use crate::error::TribsError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Subject of the annotation that calibrates a page's scale.
pub const SCALE_SUBJECT: &str = "SCALE";

/// Subject of the annotation holding the weight criteria text block.
pub const CRITERIA_SUBJECT: &str = "EFFECTIVE SEISMIC WEIGHT CRITERIA";

/// An (x, y) pair. Units depend on context: PDF units or feet.
pub type PlanarCoord = (f64, f64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnotationSubtype {
    Line,
    PolyLine,
    Polygon,
    Other,
}

impl AnnotationSubtype {
    /// Map a PDF `/Subtype` name (without the leading slash) to a subtype.
    pub fn from_pdf_name(name: &str) -> AnnotationSubtype {
        match name.trim_start_matches('/') {
            "Line" => AnnotationSubtype::Line,
            "PolyLine" => AnnotationSubtype::PolyLine,
            "Polygon" => AnnotationSubtype::Polygon,
            _ => AnnotationSubtype::Other,
        }
    }

    pub fn is_geometry(&self) -> bool {
        !matches!(self, AnnotationSubtype::Other)
    }
}

impl fmt::Display for AnnotationSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotationSubtype::Line => write!(f, "Line"),
            AnnotationSubtype::PolyLine => write!(f, "PolyLine"),
            AnnotationSubtype::Polygon => write!(f, "Polygon"),
            AnnotationSubtype::Other => write!(f, "Other"),
        }
    }
}

/// An annotation as read from the document, before any unit conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAnnotation {
    pub subtype: AnnotationSubtype,
    pub subject: Option<String>,
    pub contents: Option<String>,
    /// Flat x0, y0, x1, y1, ... sequence in PDF units.
    pub coords: Vec<f64>,
    /// Degrees. Zero when the annotation carries no `/Rotation`.
    #[serde(default)]
    pub rotation: f64,
}

impl RawAnnotation {
    pub fn subject_is(&self, subject: &str) -> bool {
        self.subject.as_deref() == Some(subject)
    }
}

/// Real-world inches per PDF unit for a single page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    pub fn new(inches_per_unit: f64) -> Result<ScaleFactor, String> {
        if !inches_per_unit.is_finite() {
            return Err(format!("scale factor {inches_per_unit} is not finite"));
        }
        if inches_per_unit <= 0.0 {
            return Err(format!("scale factor {inches_per_unit} must be positive"));
        }
        Ok(ScaleFactor(inches_per_unit))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    /// PDF units to feet.
    pub fn to_feet(&self, c: f64) -> f64 {
        c * self.0 / 12.0
    }

    /// Feet back to PDF units.
    pub fn to_document(&self, c: f64) -> f64 {
        c * 12.0 / self.0
    }

    pub fn coord_to_document(&self, (x, y): PlanarCoord) -> PlanarCoord {
        (self.to_document(x), self.to_document(y))
    }
}

impl fmt::Display for ScaleFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A geometry annotation converted to feet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedAnnotation {
    pub subtype: AnnotationSubtype,
    pub subject: Option<String>,
    pub contents: Option<String>,
    pub coords: Vec<PlanarCoord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPage {
    /// 1-based.
    pub page_number: usize,
    pub scale_factor: ScaleFactor,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_criteria: Option<WeightCriteria>,
    pub annotations: Vec<NormalizedAnnotation>,
}

/// Element vocabulary recognised by the subject prefix.
///
/// Variant order is the report order: roofs, floors, then walls.
/// Areas never appear as report elements and sort last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ElementType {
    Roof,
    Floor,
    Wall,
    Area,
}

impl ElementType {
    pub fn from_prefix(prefix: &str) -> Option<ElementType> {
        match prefix {
            "A" => Some(ElementType::Area),
            "F" => Some(ElementType::Floor),
            "R" => Some(ElementType::Roof),
            "W" => Some(ElementType::Wall),
            _ => None,
        }
    }

    /// Category heading used in the weight criteria block.
    pub fn category(&self) -> &'static str {
        match self {
            ElementType::Roof => "Roofs",
            ElementType::Floor => "Floors",
            ElementType::Wall => "Walls",
            ElementType::Area => "Areas",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementType::Roof => write!(f, "Roof"),
            ElementType::Floor => write!(f, "Floor"),
            ElementType::Wall => write!(f, "Wall"),
            ElementType::Area => write!(f, "Area"),
        }
    }
}

/// Engineering parameters for one labelled element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriteriaEntry {
    /// psf
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    /// ft, walls only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    /// psf, roofs only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snow: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeightCriteria {
    pub walls: BTreeMap<String, CriteriaEntry>,
    pub floors: BTreeMap<String, CriteriaEntry>,
    pub roofs: BTreeMap<String, CriteriaEntry>,
}

impl WeightCriteria {
    pub fn category(&self, element_type: ElementType) -> Option<&BTreeMap<String, CriteriaEntry>> {
        match element_type {
            ElementType::Wall => Some(&self.walls),
            ElementType::Floor => Some(&self.floors),
            ElementType::Roof => Some(&self.roofs),
            ElementType::Area => None,
        }
    }

    /// Look up a label, failing loudly when the block does not define it.
    pub fn lookup(
        &self,
        element_type: ElementType,
        label: &str,
    ) -> Result<&CriteriaEntry, TribsError> {
        self.category(element_type)
            .and_then(|entries| entries.get(label))
            .ok_or_else(|| TribsError::MissingCriteria {
                element_type,
                label: label.to_string(),
            })
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty() && self.floors.is_empty() && self.roofs.is_empty()
    }
}
