//! Per-page conversion of raw annotations into real-world geometry.
//!
//! Runs as three separate passes over the page's annotations. The calibration
//! pass must succeed before the geometry pass can run, since every coordinate
//! is converted with the scale it produces.

use crate::error::TribsError;
use crate::model::{
    AnnotationSubtype, NormalizedAnnotation, NormalizedPage, PlanarCoord, RawAnnotation,
    ScaleFactor, WeightCriteria, CRITERIA_SUBJECT, SCALE_SUBJECT,
};
use crate::parsing::{parse_scale_inches, parse_weight_criteria};
use geo::{Centroid, LineString, Polygon, Rotate};
use tracing::debug;

/// Result of the calibration pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub scale_factor: ScaleFactor,
    /// Real-world length written on the SCALE line.
    pub label_inches: f64,
    /// Length of the SCALE line in PDF units.
    pub line_length: f64,
}

/// Normalize one page. Returns `None` when the page cannot be scaled.
pub fn normalize_page(
    page_number: usize,
    annotations: &[RawAnnotation],
) -> Result<Option<NormalizedPage>, TribsError> {
    if annotations.is_empty() {
        debug!(page_number, "page has no annotations, skipping");
        return Ok(None);
    }

    let Some(calibration) = locate_calibration(page_number, annotations)? else {
        debug!(page_number, "page has no SCALE annotation, skipping");
        return Ok(None);
    };

    let converted = convert_geometry(page_number, annotations, calibration.scale_factor)?;
    let weight_criteria = locate_criteria(annotations)?;

    debug!(
        page_number,
        scale_factor = calibration.scale_factor.value(),
        annotations = converted.len(),
        has_criteria = weight_criteria.is_some(),
        "normalized page"
    );

    Ok(Some(NormalizedPage {
        page_number,
        scale_factor: calibration.scale_factor,
        weight_criteria,
        annotations: converted,
    }))
}

/// Find the first `SCALE` annotation and derive the page's scale from it.
pub fn locate_calibration(
    page_number: usize,
    annotations: &[RawAnnotation],
) -> Result<Option<Calibration>, TribsError> {
    let Some(scale) = annotations.iter().find(|a| a.subject_is(SCALE_SUBJECT)) else {
        return Ok(None);
    };

    let invalid = |reason: String| TribsError::InvalidCalibration {
        page: page_number,
        reason,
    };

    let [x0, y0, x1, y1] = scale.coords.as_slice() else {
        return Err(invalid(format!(
            "expected a 2-point line, got {} coordinate values",
            scale.coords.len()
        )));
    };

    let line_length = (x1 - x0).hypot(y1 - y0);
    if line_length <= 0.0 {
        return Err(invalid("SCALE line has zero length".into()));
    }

    let label_inches = parse_scale_inches(scale.contents.as_deref())?;
    let scale_factor = ScaleFactor::new(label_inches / line_length).map_err(invalid)?;

    Ok(Some(Calibration {
        scale_factor,
        label_inches,
        line_length,
    }))
}

/// Convert every non-calibration line, polyline and polygon into feet.
pub fn convert_geometry(
    page_number: usize,
    annotations: &[RawAnnotation],
    scale: ScaleFactor,
) -> Result<Vec<NormalizedAnnotation>, TribsError> {
    let mut converted = Vec::new();

    for annotation in annotations {
        if annotation.subject_is(SCALE_SUBJECT) || !annotation.subtype.is_geometry() {
            continue;
        }

        if annotation.coords.len() % 2 != 0 {
            return Err(TribsError::InvalidCoordinates {
                page: page_number,
                subject: annotation.subject.clone().unwrap_or_default(),
                count: annotation.coords.len(),
            });
        }

        let mut coords: Vec<PlanarCoord> = annotation
            .coords
            .chunks_exact(2)
            .map(|pair| (scale.to_feet(pair[0]), scale.to_feet(pair[1])))
            .collect();

        // Lines carry no rotation.
        if annotation.subtype != AnnotationSubtype::Line && annotation.rotation != 0.0 {
            coords = unrotate_ring(coords, annotation.rotation);
        }

        converted.push(NormalizedAnnotation {
            subtype: annotation.subtype,
            subject: annotation.subject.clone(),
            contents: annotation.contents.clone(),
            coords,
        });
    }

    Ok(converted)
}

/// Parse the first weight criteria annotation, if the page has one.
pub fn locate_criteria(
    annotations: &[RawAnnotation],
) -> Result<Option<WeightCriteria>, TribsError> {
    annotations
        .iter()
        .find(|a| a.subject_is(CRITERIA_SUBJECT))
        .map(|a| parse_weight_criteria(a.contents.as_deref().unwrap_or_default()))
        .transpose()
}

/// Rotate a ring about its centroid by `-rotation` degrees and drop the
/// closing vertex.
fn unrotate_ring(coords: Vec<PlanarCoord>, rotation: f64) -> Vec<PlanarCoord> {
    let polygon = Polygon::new(LineString::from(coords.clone()), vec![]);
    let Some(centroid) = polygon.centroid() else {
        return coords;
    };

    let rotated = polygon.rotate_around_point(-rotation, centroid);
    let mut ring: Vec<PlanarCoord> = rotated.exterior().coords().map(|c| (c.x, c.y)).collect();
    ring.pop();
    ring
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotation(
        subtype: AnnotationSubtype,
        subject: &str,
        contents: Option<&str>,
        coords: &[f64],
    ) -> RawAnnotation {
        RawAnnotation {
            subtype,
            subject: Some(subject.to_string()),
            contents: contents.map(str::to_string),
            coords: coords.to_vec(),
            rotation: 0.0,
        }
    }

    fn scale_line(contents: &str, length: f64) -> RawAnnotation {
        annotation(
            AnnotationSubtype::Line,
            SCALE_SUBJECT,
            Some(contents),
            &[100.0, 100.0, 100.0 + length, 100.0],
        )
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_calibration_from_scale_line() {
        let annotations = vec![scale_line("1'-0\"", 10.0)];
        let cal = locate_calibration(1, &annotations).unwrap().unwrap();
        assert!(close(cal.scale_factor.value(), 1.2));
        assert!(close(cal.line_length, 10.0));
        assert_eq!(cal.label_inches, 12.0);
    }

    #[test]
    fn test_first_scale_annotation_wins() {
        let annotations = vec![scale_line("1'-0\"", 10.0), scale_line("2'-0\"", 10.0)];
        let cal = locate_calibration(1, &annotations).unwrap().unwrap();
        assert!(close(cal.scale_factor.value(), 1.2));
    }

    #[test]
    fn test_page_without_scale_is_skipped() {
        let annotations = vec![annotation(
            AnnotationSubtype::Polygon,
            "A: R1",
            None,
            &[0.0, 0.0, 10.0, 0.0, 10.0, 10.0],
        )];
        assert!(normalize_page(1, &annotations).unwrap().is_none());
    }

    #[test]
    fn test_empty_page_is_skipped() {
        assert!(normalize_page(3, &[]).unwrap().is_none());
    }

    #[test]
    fn test_scale_with_wrong_point_count_is_error() {
        let annotations = vec![annotation(
            AnnotationSubtype::PolyLine,
            SCALE_SUBJECT,
            Some("1'-0\""),
            &[0.0, 0.0, 5.0, 0.0, 10.0, 0.0],
        )];
        let err = locate_calibration(2, &annotations).unwrap_err();
        assert!(matches!(err, TribsError::InvalidCalibration { page: 2, .. }));
    }

    #[test]
    fn test_zero_length_scale_is_error() {
        let annotations = vec![annotation(
            AnnotationSubtype::Line,
            SCALE_SUBJECT,
            Some("1'-0\""),
            &[5.0, 5.0, 5.0, 5.0],
        )];
        assert!(locate_calibration(1, &annotations).is_err());
    }

    #[test]
    fn test_malformed_scale_label_is_error() {
        let annotations = vec![scale_line("one foot", 10.0)];
        let err = normalize_page(1, &annotations).unwrap_err();
        assert!(matches!(err, TribsError::ScaleParse { .. }));
    }

    #[test]
    fn test_empty_scale_label_uses_default() {
        let mut line = scale_line("", 24.0);
        line.contents = None;
        let cal = locate_calibration(1, &[line]).unwrap().unwrap();
        assert!(close(cal.scale_factor.value(), 1.0 / 24.0));
    }

    #[test]
    fn test_coordinates_converted_to_feet() {
        let annotations = vec![
            scale_line("1'-0\"", 10.0),
            annotation(
                AnnotationSubtype::Line,
                "W: W1",
                None,
                &[0.0, 5.0, 10.0, 5.0],
            ),
        ];
        let page = normalize_page(1, &annotations).unwrap().unwrap();
        assert_eq!(page.annotations.len(), 1);
        let coords = &page.annotations[0].coords;
        assert!(close(coords[0].0, 0.0));
        assert!(close(coords[0].1, 0.5));
        assert!(close(coords[1].0, 1.0));
        assert!(close(coords[1].1, 0.5));
    }

    #[test]
    fn test_scale_and_other_subtypes_excluded() {
        let annotations = vec![
            scale_line("1'-0\"", 10.0),
            annotation(AnnotationSubtype::Other, "A: R1", Some("note"), &[0.0, 0.0]),
            annotation(AnnotationSubtype::Line, SCALE_SUBJECT, Some("2'"), &[0.0, 0.0, 1.0, 1.0]),
        ];
        let page = normalize_page(1, &annotations).unwrap().unwrap();
        assert!(page.annotations.is_empty());
    }

    #[test]
    fn test_odd_coordinate_count_is_error() {
        let annotations = vec![
            scale_line("1'-0\"", 10.0),
            annotation(AnnotationSubtype::PolyLine, "W: W1", None, &[0.0, 0.0, 1.0]),
        ];
        let err = normalize_page(4, &annotations).unwrap_err();
        assert!(matches!(err, TribsError::InvalidCoordinates { page: 4, count: 3, .. }));
    }

    #[test]
    fn test_rotated_polygon_is_unrotated_about_centroid() {
        // Square of side 12 feet at scale 12 in/unit, rotated 90 degrees.
        let mut square = annotation(
            AnnotationSubtype::Polygon,
            "A: R1",
            None,
            &[0.0, 0.0, 12.0, 0.0, 12.0, 6.0, 0.0, 6.0],
        );
        square.rotation = 90.0;
        let annotations = vec![scale_line("1'-0\"", 1.0), square];
        let page = normalize_page(1, &annotations).unwrap().unwrap();
        let coords = &page.annotations[0].coords;

        // Closing vertex dropped.
        assert_eq!(coords.len(), 4);

        // Centroid (6, 3) is preserved; the 12x6 rectangle becomes 6x12.
        let (min_x, max_x) = coords
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), c| (lo.min(c.0), hi.max(c.0)));
        let (min_y, max_y) = coords
            .iter()
            .fold((f64::MAX, f64::MIN), |(lo, hi), c| (lo.min(c.1), hi.max(c.1)));
        assert!(close(max_x - min_x, 6.0));
        assert!(close(max_y - min_y, 12.0));
        assert!(close((min_x + max_x) / 2.0, 6.0));
        assert!(close((min_y + max_y) / 2.0, 3.0));

        // -90 degrees sends the first corner (0, 0) to (3, 9).
        assert!(close(coords[0].0, 3.0));
        assert!(close(coords[0].1, 9.0));
    }

    #[test]
    fn test_rotation_ignored_for_lines() {
        let mut wall = annotation(AnnotationSubtype::Line, "W: W1", None, &[0.0, 0.0, 12.0, 0.0]);
        wall.rotation = 45.0;
        let annotations = vec![scale_line("1'-0\"", 1.0), wall];
        let page = normalize_page(1, &annotations).unwrap().unwrap();
        assert_eq!(page.annotations[0].coords, vec![(0.0, 0.0), (12.0, 0.0)]);
    }

    #[test]
    fn test_criteria_attached_to_page() {
        let annotations = vec![
            scale_line("1'-0\"", 10.0),
            annotation(
                AnnotationSubtype::Other,
                CRITERIA_SUBJECT,
                Some("===Walls\nW: W1\nWeight: 10\nHeight: 8"),
                &[],
            ),
        ];
        let page = normalize_page(1, &annotations).unwrap().unwrap();
        let criteria = page.weight_criteria.unwrap();
        assert_eq!(criteria.walls["W1"].height, Some(8.0));
    }

    #[test]
    fn test_bad_criteria_propagates() {
        let annotations = vec![
            scale_line("1'-0\"", 10.0),
            annotation(
                AnnotationSubtype::Other,
                CRITERIA_SUBJECT,
                Some("===Walls\nWeight: 10"),
                &[],
            ),
        ];
        assert!(matches!(
            normalize_page(1, &annotations),
            Err(TribsError::CriteriaKeyWithoutLabel { .. })
        ));
    }
}
