//! Validation and coordinate helpers shared by the intersection engine.

use crate::error::TribsError;
use crate::model::{ElementType, PlanarCoord, ScaleFactor};
use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Area, Contains, Coord, Line, LineString, Point, Polygon};

/// Parameters closer than this along a segment are the same split point.
const SPLIT_EPSILON: f64 = 1e-12;

/// Reject rings that the boolean operations cannot handle meaningfully:
/// fewer than three distinct vertices, non-finite coordinates, zero area,
/// or edges that cross each other.
pub fn validate_ring(
    element_type: ElementType,
    label: &str,
    polygon: &Polygon<f64>,
) -> Result<(), TribsError> {
    let invalid = |reason: &str| TribsError::InvalidGeometry {
        element_type,
        label: label.to_string(),
        reason: reason.to_string(),
    };

    let exterior = polygon.exterior();
    if exterior.coords().any(|c| !is_finite(c)) {
        return Err(invalid("non-finite coordinate"));
    }

    let mut ring: Vec<Coord<f64>> = exterior.coords().copied().collect();
    ring.dedup();
    // `ring` is closed, so three distinct vertices means four coordinates.
    if ring.len() < 4 {
        return Err(invalid("a polygon needs at least three distinct vertices"));
    }

    if polygon.unsigned_area() <= 0.0 {
        return Err(invalid("polygon encloses no area"));
    }

    let edges: Vec<Line<f64>> = ring.windows(2).map(|w| Line::new(w[0], w[1])).collect();
    let n = edges.len();
    for i in 0..n {
        for j in (i + 2)..n {
            // First and last edges meet at the closing vertex.
            if i == 0 && j == n - 1 {
                continue;
            }
            if line_intersection(edges[i], edges[j]).is_some() {
                return Err(invalid("polygon edges cross each other"));
            }
        }
    }

    Ok(())
}

/// A wall chain needs two distinct finite points.
pub fn validate_chain(
    element_type: ElementType,
    label: &str,
    chain: &LineString<f64>,
) -> Result<(), TribsError> {
    let invalid = |reason: &str| TribsError::InvalidGeometry {
        element_type,
        label: label.to_string(),
        reason: reason.to_string(),
    };

    if chain.coords().any(|c| !is_finite(c)) {
        return Err(invalid("non-finite coordinate"));
    }

    let mut points: Vec<Coord<f64>> = chain.coords().copied().collect();
    points.dedup();
    if points.len() < 2 {
        return Err(invalid("a wall needs at least two distinct points"));
    }

    Ok(())
}

pub fn chain_coords(chain: &LineString<f64>) -> Vec<PlanarCoord> {
    chain.coords().map(|c| (c.x, c.y)).collect()
}

/// Exterior ring without the closing vertex.
pub fn ring_coords(polygon: &Polygon<f64>) -> Vec<PlanarCoord> {
    let mut coords = chain_coords(polygon.exterior());
    if coords.len() > 1 && coords.first() == coords.last() {
        coords.pop();
    }
    coords
}

pub fn to_document(coords: &[PlanarCoord], scale: ScaleFactor) -> Vec<PlanarCoord> {
    coords.iter().map(|&c| scale.coord_to_document(c)).collect()
}

/// Pieces of `chain` inside `polygon` or on its boundary.
///
/// Runs along an edge count as inside, so a wall drawn on an area's outline
/// or on the line between two areas keeps its length. Consecutive inside
/// pieces are joined into one chain.
pub fn clip_chain(polygon: &Polygon<f64>, chain: &LineString<f64>) -> Vec<LineString<f64>> {
    let edges: Vec<Line<f64>> = polygon
        .exterior()
        .lines()
        .chain(polygon.interiors().iter().flat_map(|ring| ring.lines()))
        .collect();

    let mut pieces = Vec::new();
    let mut current: Vec<Coord<f64>> = Vec::new();

    for segment in chain.lines() {
        if segment.start == segment.end {
            continue;
        }
        let (splits, on_edge) = split_params(segment, &edges);
        for pair in splits.windows(2) {
            let (t0, t1) = (pair[0], pair[1]);
            let mid = (t0 + t1) / 2.0;
            let inside = on_edge.iter().any(|&(a, b)| a <= mid && mid <= b)
                || polygon.contains(&Point::from(point_at(segment, mid)));

            if !inside {
                flush(&mut current, &mut pieces);
                continue;
            }
            let start = point_at(segment, t0);
            if current.last() != Some(&start) {
                flush(&mut current, &mut pieces);
                current.push(start);
            }
            current.push(point_at(segment, t1));
        }
    }
    flush(&mut current, &mut pieces);

    pieces
}

/// Sorted split parameters along `segment` where it meets an edge, plus the
/// parameter ranges where it runs along one.
fn split_params(segment: Line<f64>, edges: &[Line<f64>]) -> (Vec<f64>, Vec<(f64, f64)>) {
    let mut splits = vec![0.0, 1.0];
    let mut on_edge = Vec::new();

    for edge in edges {
        match line_intersection(segment, *edge) {
            Some(LineIntersection::SinglePoint { intersection, .. }) => {
                splits.push(param_of(segment, intersection));
            }
            Some(LineIntersection::Collinear { intersection }) => {
                let a = param_of(segment, intersection.start);
                let b = param_of(segment, intersection.end);
                splits.push(a);
                splits.push(b);
                on_edge.push((a.min(b), a.max(b)));
            }
            None => {}
        }
    }

    splits.sort_by(f64::total_cmp);
    splits.dedup_by(|a, b| (*a - *b).abs() < SPLIT_EPSILON);
    if let Some(last) = splits.last_mut() {
        *last = 1.0;
    }
    (splits, on_edge)
}

fn param_of(segment: Line<f64>, c: Coord<f64>) -> f64 {
    let d = segment.delta();
    let t = ((c.x - segment.start.x) * d.x + (c.y - segment.start.y) * d.y)
        / (d.x * d.x + d.y * d.y);
    t.clamp(0.0, 1.0)
}

fn point_at(segment: Line<f64>, t: f64) -> Coord<f64> {
    if t <= 0.0 {
        segment.start
    } else if t >= 1.0 {
        segment.end
    } else {
        segment.start + segment.delta() * t
    }
}

fn flush(current: &mut Vec<Coord<f64>>, pieces: &mut Vec<LineString<f64>>) {
    if current.len() >= 2 {
        pieces.push(LineString::new(std::mem::take(current)));
    } else {
        current.clear();
    }
}

fn is_finite(c: &Coord<f64>) -> bool {
    c.x.is_finite() && c.y.is_finite()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn polygon(coords: &[PlanarCoord]) -> Polygon<f64> {
        Polygon::new(LineString::from(coords.to_vec()), vec![])
    }

    #[test]
    fn test_valid_square() {
        let p = polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0), (0.0, 1.0)]);
        assert!(validate_ring(ElementType::Area, "R1", &p).is_ok());
    }

    #[test]
    fn test_valid_triangle() {
        let p = polygon(&[(0.0, 0.0), (4.0, 0.0), (0.0, 3.0)]);
        assert!(validate_ring(ElementType::Floor, "F1", &p).is_ok());
    }

    #[test]
    fn test_bow_tie_rejected() {
        let p = polygon(&[(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0)]);
        let err = validate_ring(ElementType::Area, "R1", &p).unwrap_err();
        assert!(matches!(err, TribsError::InvalidGeometry { .. }));
    }

    #[test]
    fn test_too_few_vertices_rejected() {
        let p = polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 0.0)]);
        assert!(validate_ring(ElementType::Roof, "R1", &p).is_err());
    }

    #[test]
    fn test_collinear_ring_rejected() {
        let p = polygon(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0)]);
        assert!(validate_ring(ElementType::Roof, "R1", &p).is_err());
    }

    #[test]
    fn test_nan_rejected() {
        let p = polygon(&[(0.0, 0.0), (f64::NAN, 0.0), (1.0, 1.0)]);
        assert!(validate_ring(ElementType::Area, "R1", &p).is_err());
    }

    #[test]
    fn test_degenerate_wall_rejected() {
        let w = LineString::from(vec![(2.0, 2.0), (2.0, 2.0)]);
        assert!(validate_chain(ElementType::Wall, "W1", &w).is_err());
        let w = LineString::from(vec![(2.0, 2.0), (3.0, 2.0)]);
        assert!(validate_chain(ElementType::Wall, "W1", &w).is_ok());
    }

    fn square() -> Polygon<f64> {
        polygon(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)])
    }

    fn total_length(pieces: &[LineString<f64>]) -> f64 {
        pieces
            .iter()
            .flat_map(|piece| piece.lines())
            .map(|line| line.dx().hypot(line.dy()))
            .sum()
    }

    #[test]
    fn test_clip_chain_keeps_edge_runs() {
        let along_bottom = LineString::from(vec![(0.0, 0.0), (10.0, 0.0)]);
        let pieces = clip_chain(&square(), &along_bottom);
        assert_eq!(pieces.len(), 1);
        assert!((total_length(&pieces) - 10.0).abs() < 1e-9);

        let past_right_edge = LineString::from(vec![(10.0, -5.0), (10.0, 15.0)]);
        let pieces = clip_chain(&square(), &past_right_edge);
        assert_eq!(pieces[0].0, vec![Coord { x: 10.0, y: 0.0 }, Coord { x: 10.0, y: 10.0 }]);
    }

    #[test]
    fn test_clip_chain_joins_inside_and_edge_parts() {
        let l_shape = LineString::from(vec![(5.0, 5.0), (5.0, 0.0), (10.0, 0.0)]);
        let pieces = clip_chain(&square(), &l_shape);
        assert_eq!(pieces.len(), 1);
        assert_eq!(pieces[0].0.len(), 3);
        assert!((total_length(&pieces) - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_clip_chain_drops_outside_parts() {
        let crossing = LineString::from(vec![(-5.0, 5.0), (15.0, 5.0), (15.0, 20.0)]);
        let pieces = clip_chain(&square(), &crossing);
        assert_eq!(pieces.len(), 1);
        assert!((total_length(&pieces) - 10.0).abs() < 1e-9);

        let touching_corner = LineString::from(vec![(10.0, 10.0), (20.0, 20.0)]);
        assert!(clip_chain(&square(), &touching_corner).is_empty());
    }

    #[test]
    fn test_ring_coords_drop_closing_vertex() {
        let p = polygon(&[(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
        assert_eq!(ring_coords(&p), vec![(0.0, 0.0), (1.0, 0.0), (1.0, 1.0)]);
    }
}
