use crate::model::{ElementType, PlanarCoord, ScaleFactor};
use serde::{Deserialize, Serialize};

/// One piece of overlap between an area and an element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionShape {
    /// Feet. Polygon rings omit the closing vertex.
    pub real_coords: Vec<PlanarCoord>,
    /// The same shape in PDF units, for locating it on the drawing.
    pub document_coords: Vec<PlanarCoord>,
    /// Length (ft) for walls, area (sf) for floors and roofs.
    pub value: f64,
}

/// Accumulated overlap between one area and one wall, floor or roof.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionRecord {
    pub area_label: String,
    pub element_type: ElementType,
    pub element_label: String,
    /// Sum of `shapes[..].value`.
    pub total: f64,
    pub shapes: Vec<IntersectionShape>,
}

impl IntersectionRecord {
    /// A zero-valued record with no shapes.
    pub fn empty(area_label: &str, element_type: ElementType, element_label: &str) -> Self {
        IntersectionRecord {
            area_label: area_label.to_string(),
            element_type,
            element_label: element_label.to_string(),
            total: 0.0,
            shapes: Vec::new(),
        }
    }

    pub fn push(&mut self, shape: IntersectionShape) {
        self.total += shape.value;
        self.shapes.push(shape);
    }

    /// Overlap length in feet. Zero for floors and roofs.
    pub fn length(&self) -> f64 {
        match self.element_type {
            ElementType::Wall => self.total,
            _ => 0.0,
        }
    }

    /// Overlap area in square feet. Zero for walls.
    pub fn area(&self) -> f64 {
        match self.element_type {
            ElementType::Floor | ElementType::Roof => self.total,
            _ => 0.0,
        }
    }
}

/// An area's own outline in both coordinate systems.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaOutline {
    pub label: String,
    pub real_coords: Vec<PlanarCoord>,
    pub document_coords: Vec<PlanarCoord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntersectionAnalysis {
    pub page_number: usize,
    pub scale_factor: ScaleFactor,
    pub areas: Vec<AreaOutline>,
    /// One record per (area, element) pair, including pairs with no overlap.
    pub records: Vec<IntersectionRecord>,
}

impl IntersectionAnalysis {
    pub fn record(
        &self,
        area_label: &str,
        element_type: ElementType,
        element_label: &str,
    ) -> Option<&IntersectionRecord> {
        self.records.iter().find(|r| {
            r.area_label == area_label
                && r.element_type == element_type
                && r.element_label == element_label
        })
    }
}
