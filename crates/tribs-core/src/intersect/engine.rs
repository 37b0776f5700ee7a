use crate::classify::ClassifiedPage;
use crate::error::TribsError;
use crate::intersect::geometry::{
    chain_coords, clip_chain, ring_coords, to_document, validate_chain, validate_ring,
};
use crate::intersect::outcome::{
    AreaOutline, IntersectionAnalysis, IntersectionRecord, IntersectionShape,
};
use crate::model::{ElementType, ScaleFactor};
use geo::{Area, BooleanOps, EuclideanLength, Intersects, LineString, Polygon};
use std::collections::BTreeMap;
use tracing::debug;

/// Overlap pieces at or below this size (ft or sf) are numerical noise from
/// the boolean operations and contribute nothing.
const MIN_CONTRIBUTION: f64 = 1e-9;

/// Intersect every area on the page with every wall, floor and roof.
///
/// Every (area, element) pair gets a record, so a pair that does not overlap
/// shows up with a total of zero instead of being absent.
pub fn compute_intersections(
    page: &ClassifiedPage,
    scale: ScaleFactor,
) -> Result<IntersectionAnalysis, TribsError> {
    validate_page(page)?;

    let mut areas = Vec::with_capacity(page.areas.len());
    let mut records = Vec::new();

    for (area_label, area) in &page.areas {
        let real_coords = ring_coords(area);
        areas.push(AreaOutline {
            label: area_label.clone(),
            document_coords: to_document(&real_coords, scale),
            real_coords,
        });

        for (label, wall) in &page.walls {
            let mut record = IntersectionRecord::empty(area_label, ElementType::Wall, label);
            accumulate_wall(&mut record, area, wall, scale);
            records.push(record);
        }

        let polygons = [
            (ElementType::Floor, &page.floors),
            (ElementType::Roof, &page.roofs),
        ];
        for (element_type, elements) in polygons {
            for (label, polygon) in elements {
                let mut record = IntersectionRecord::empty(area_label, element_type, label);
                accumulate_polygon(&mut record, area, polygon, scale);
                records.push(record);
            }
        }
    }

    debug!(
        page = page.page_number,
        areas = areas.len(),
        records = records.len(),
        overlapping = records.iter().filter(|r| !r.shapes.is_empty()).count(),
        "computed intersections"
    );

    Ok(IntersectionAnalysis {
        page_number: page.page_number,
        scale_factor: scale,
        areas,
        records,
    })
}

fn validate_page(page: &ClassifiedPage) -> Result<(), TribsError> {
    let rings: [(ElementType, &BTreeMap<String, Polygon<f64>>); 3] = [
        (ElementType::Area, &page.areas),
        (ElementType::Floor, &page.floors),
        (ElementType::Roof, &page.roofs),
    ];
    for (element_type, polygons) in rings {
        for (label, polygon) in polygons {
            validate_ring(element_type, label, polygon)?;
        }
    }
    for (label, wall) in &page.walls {
        validate_chain(ElementType::Wall, label, wall)?;
    }
    Ok(())
}

/// Clip the wall chain to the area (boundary included) and record each piece.
fn accumulate_wall(
    record: &mut IntersectionRecord,
    area: &Polygon<f64>,
    wall: &LineString<f64>,
    scale: ScaleFactor,
) {
    if !area.intersects(wall) {
        return;
    }

    for piece in clip_chain(area, wall) {
        let length = piece.euclidean_length();
        if length <= MIN_CONTRIBUTION {
            continue;
        }
        let real_coords = chain_coords(&piece);
        record.push(IntersectionShape {
            document_coords: to_document(&real_coords, scale),
            real_coords,
            value: length,
        });
    }
}

/// Intersect two rings and record each resulting polygon.
fn accumulate_polygon(
    record: &mut IntersectionRecord,
    area: &Polygon<f64>,
    other: &Polygon<f64>,
    scale: ScaleFactor,
) {
    if !area.intersects(other) {
        return;
    }

    let overlap = area.intersection(other);
    for piece in overlap {
        let piece_area = piece.unsigned_area();
        if piece_area <= MIN_CONTRIBUTION {
            continue;
        }
        let real_coords = ring_coords(&piece);
        record.push(IntersectionShape {
            document_coords: to_document(&real_coords, scale),
            real_coords,
            value: piece_area,
        });
    }
}
