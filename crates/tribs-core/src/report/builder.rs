use crate::error::TribsError;
use crate::intersect::IntersectionRecord;
use crate::model::{ElementType, WeightCriteria};
use crate::report::row::ReportRow;

/// Join intersection records with the page's weight criteria.
///
/// Every record must have a criteria entry carrying the parameters its
/// formula needs; nothing is defaulted. Rows come back sorted.
pub fn build_report(
    records: &[IntersectionRecord],
    criteria: &WeightCriteria,
) -> Result<Vec<ReportRow>, TribsError> {
    let mut rows = records
        .iter()
        .map(|record| build_row(record, criteria))
        .collect::<Result<Vec<_>, _>>()?;
    sort_rows(&mut rows);
    Ok(rows)
}

/// Region, then roof < floor < wall, then label.
pub fn sort_rows(rows: &mut [ReportRow]) {
    rows.sort_by(|a, b| {
        a.region
            .cmp(&b.region)
            .then(a.element_type.cmp(&b.element_type))
            .then_with(|| a.element_label.cmp(&b.element_label))
    });
}

fn build_row(
    record: &IntersectionRecord,
    criteria: &WeightCriteria,
) -> Result<ReportRow, TribsError> {
    let entry = criteria.lookup(record.element_type, &record.element_label)?;
    let require = |value: Option<f64>, parameter: &'static str| {
        value.ok_or_else(|| TribsError::MissingParameter {
            element_type: record.element_type,
            label: record.element_label.clone(),
            parameter,
        })
    };

    let mut row = ReportRow {
        region: record.area_label.clone(),
        element_type: record.element_type,
        element_label: record.element_label.clone(),
        height: 0.0,
        weight: require(entry.weight, "Weight")?,
        snow_weight: 0.0,
        length: record.length(),
        area: record.area(),
        total_weight: 0.0,
    };

    match record.element_type {
        ElementType::Wall => {
            row.height = require(entry.height, "Height")?;
            row.total_weight = row.length * row.height * row.weight;
        }
        ElementType::Roof => {
            row.snow_weight = require(entry.snow, "Snow")?;
            row.total_weight = row.area * (row.weight + row.snow_weight);
        }
        // Areas have no criteria category, so lookup has already failed for them.
        ElementType::Floor | ElementType::Area => {
            row.total_weight = row.area * row.weight;
        }
    }

    Ok(row)
}
