use crate::error::TribsError;
use crate::model::{ElementType, NormalizedPage, PlanarCoord};
use geo::{LineString, Polygon};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// What to do when two elements of the same type share a label on a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The later annotation replaces the earlier one.
    #[default]
    Overwrite,
    /// Fail with [`TribsError::DuplicateLabel`].
    RejectDuplicate,
}

/// A page's elements split by type and keyed by label.
#[derive(Debug, Clone, Default)]
pub struct ClassifiedPage {
    pub page_number: usize,
    pub areas: BTreeMap<String, Polygon<f64>>,
    pub floors: BTreeMap<String, Polygon<f64>>,
    pub roofs: BTreeMap<String, Polygon<f64>>,
    pub walls: BTreeMap<String, LineString<f64>>,
}

impl ClassifiedPage {
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
            && self.floors.is_empty()
            && self.roofs.is_empty()
            && self.walls.is_empty()
    }

    pub fn element_count(&self) -> usize {
        self.areas.len() + self.floors.len() + self.roofs.len() + self.walls.len()
    }
}

/// Split a subject of the form `<prefix>: <label>`.
///
/// Returns `None` unless the subject contains exactly one `": "` separator
/// and the prefix is one of `A`, `F`, `R`, `W`.
pub fn parse_subject(subject: &str) -> Option<(ElementType, &str)> {
    let mut parts = subject.split(": ");
    let prefix = parts.next()?;
    let label = parts.next()?;
    if parts.next().is_some() {
        return None;
    }
    ElementType::from_prefix(prefix).map(|t| (t, label))
}

/// Route a normalized page's annotations into typed element maps.
///
/// Annotations whose subject is outside the `A:`/`F:`/`R:`/`W:` vocabulary
/// are dropped.
pub fn classify(
    page: &NormalizedPage,
    policy: DuplicatePolicy,
) -> Result<ClassifiedPage, TribsError> {
    let mut classified = ClassifiedPage {
        page_number: page.page_number,
        ..Default::default()
    };

    for annotation in &page.annotations {
        let subject = annotation.subject.as_deref().unwrap_or_default();
        let Some((element_type, label)) = parse_subject(subject) else {
            debug!(
                page = page.page_number,
                subject,
                "ignoring annotation outside the element vocabulary"
            );
            continue;
        };

        let coords = annotation.coords.clone();
        let replaced = match element_type {
            ElementType::Area => insert(&mut classified.areas, label, ring(coords)),
            ElementType::Floor => insert(&mut classified.floors, label, ring(coords)),
            ElementType::Roof => insert(&mut classified.roofs, label, ring(coords)),
            ElementType::Wall => insert(&mut classified.walls, label, LineString::from(coords)),
        };

        if replaced {
            match policy {
                DuplicatePolicy::Overwrite => warn!(
                    page = page.page_number,
                    %element_type,
                    label,
                    "duplicate label, keeping the later annotation"
                ),
                DuplicatePolicy::RejectDuplicate => {
                    return Err(TribsError::DuplicateLabel {
                        element_type,
                        label: label.to_string(),
                    })
                }
            }
        }
    }

    Ok(classified)
}

fn ring(coords: Vec<PlanarCoord>) -> Polygon<f64> {
    Polygon::new(LineString::from(coords), vec![])
}

fn insert<G>(map: &mut BTreeMap<String, G>, label: &str, geometry: G) -> bool {
    map.insert(label.to_string(), geometry).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnnotationSubtype, NormalizedAnnotation, ScaleFactor};

    fn element(
        subtype: AnnotationSubtype,
        subject: &str,
        coords: &[PlanarCoord],
    ) -> NormalizedAnnotation {
        NormalizedAnnotation {
            subtype,
            subject: Some(subject.to_string()),
            contents: None,
            coords: coords.to_vec(),
        }
    }

    fn page(annotations: Vec<NormalizedAnnotation>) -> NormalizedPage {
        NormalizedPage {
            page_number: 1,
            scale_factor: ScaleFactor::new(1.0).unwrap(),
            weight_criteria: None,
            annotations,
        }
    }

    const SQUARE: [PlanarCoord; 4] = [(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)];

    #[test]
    fn test_parse_subject() {
        assert_eq!(parse_subject("A: R1"), Some((ElementType::Area, "R1")));
        assert_eq!(parse_subject("W: Grid 3"), Some((ElementType::Wall, "Grid 3")));
        assert_eq!(parse_subject("X: R1"), None);
        assert_eq!(parse_subject("A:R1"), None);
        assert_eq!(parse_subject("A: R1: extra"), None);
        assert_eq!(parse_subject("None"), None);
    }

    #[test]
    fn test_routes_by_prefix() {
        let p = page(vec![
            element(AnnotationSubtype::Polygon, "A: R1", &SQUARE),
            element(AnnotationSubtype::Polygon, "F: F1", &SQUARE),
            element(AnnotationSubtype::Polygon, "R: RF", &SQUARE),
            element(AnnotationSubtype::PolyLine, "W: W1", &[(0.0, 0.5), (1.0, 0.5)]),
        ]);
        let c = classify(&p, DuplicatePolicy::Overwrite).unwrap();
        assert!(c.areas.contains_key("R1"));
        assert!(c.floors.contains_key("F1"));
        assert!(c.roofs.contains_key("RF"));
        assert_eq!(c.walls["W1"].0.len(), 2);
        assert_eq!(c.element_count(), 4);
    }

    #[test]
    fn test_polygons_are_closed_rings() {
        let p = page(vec![element(AnnotationSubtype::Polygon, "A: R1", &SQUARE)]);
        let c = classify(&p, DuplicatePolicy::Overwrite).unwrap();
        let exterior = c.areas["R1"].exterior();
        assert_eq!(exterior.0.len(), 5);
        assert_eq!(exterior.0.first(), exterior.0.last());
    }

    #[test]
    fn test_unmatched_subjects_discarded() {
        let p = page(vec![
            element(AnnotationSubtype::Line, "dimension", &[(0.0, 0.0), (1.0, 0.0)]),
            element(AnnotationSubtype::Line, "Q: Q1", &[(0.0, 0.0), (1.0, 0.0)]),
        ]);
        let c = classify(&p, DuplicatePolicy::Overwrite).unwrap();
        assert!(c.is_empty());
    }

    #[test]
    fn test_duplicate_overwrites() {
        let p = page(vec![
            element(AnnotationSubtype::Line, "W: W1", &[(0.0, 0.0), (1.0, 0.0)]),
            element(AnnotationSubtype::Line, "W: W1", &[(0.0, 0.0), (5.0, 0.0)]),
        ]);
        let c = classify(&p, DuplicatePolicy::Overwrite).unwrap();
        assert_eq!(c.walls.len(), 1);
        assert_eq!(c.walls["W1"].0[1].x, 5.0);
    }

    #[test]
    fn test_duplicate_rejected() {
        let p = page(vec![
            element(AnnotationSubtype::Polygon, "F: F1", &SQUARE),
            element(AnnotationSubtype::Polygon, "F: F1", &SQUARE),
        ]);
        let err = classify(&p, DuplicatePolicy::RejectDuplicate).unwrap_err();
        assert!(matches!(
            err,
            TribsError::DuplicateLabel { element_type: ElementType::Floor, .. }
        ));
    }

    #[test]
    fn test_same_label_different_types_is_not_duplicate() {
        let p = page(vec![
            element(AnnotationSubtype::Polygon, "F: X", &SQUARE),
            element(AnnotationSubtype::Polygon, "R: X", &SQUARE),
        ]);
        assert!(classify(&p, DuplicatePolicy::RejectDuplicate).is_ok());
    }
}
