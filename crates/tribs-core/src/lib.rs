pub mod classify;
pub mod config;
pub mod error;
pub mod extraction;
pub mod intersect;
pub mod model;
pub mod normalize;
pub mod parsing;
pub mod report;

use classify::ClassifiedPage;
use config::AnalysisOptions;
use error::TribsError;
use extraction::pdf::LopdfSource;
use extraction::AnnotationSource;
use intersect::{AreaOutline, IntersectionRecord};
use model::{RawAnnotation, ScaleFactor, WeightCriteria};
use report::ReportRow;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Everything computed for one scaled page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageAnalysis {
    /// 1-based.
    pub page_number: usize,
    pub scale_factor: ScaleFactor,
    pub areas: Vec<AreaOutline>,
    pub records: Vec<IntersectionRecord>,
    pub rows: Vec<ReportRow>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentReport {
    pub pages: Vec<PageAnalysis>,
    /// 1-based numbers of pages without annotations or without a SCALE line.
    pub skipped_pages: Vec<usize>,
}

impl DocumentReport {
    /// All report rows across pages, in page order.
    pub fn rows(&self) -> impl Iterator<Item = &ReportRow> {
        self.pages.iter().flat_map(|p| p.rows.iter())
    }

    pub fn total_weight(&self) -> f64 {
        self.rows().map(|r| r.total_weight).sum()
    }
}

/// Run the full pipeline on one page's annotations.
///
/// Returns `None` for pages that are skipped (no annotations, no SCALE line).
pub fn analyze_page(
    page_number: usize,
    annotations: &[RawAnnotation],
    options: &AnalysisOptions,
) -> Result<Option<PageAnalysis>, TribsError> {
    let Some(page) = normalize::normalize_page(page_number, annotations)? else {
        return Ok(None);
    };

    let classified = classify::classify(&page, options.duplicate_policy)?;
    let analysis = intersect::compute_intersections(&classified, page.scale_factor)?;

    let empty = WeightCriteria::default();
    let criteria = match &page.weight_criteria {
        Some(criteria) => criteria,
        None if analysis.records.is_empty() => &empty,
        None => return Err(TribsError::MissingCriteriaBlock { page: page_number }),
    };

    let mut rows = report::build_report(&analysis.records, criteria)?;
    if !options.include_empty_rows {
        rows.retain(|row| !row.is_empty());
    }

    let warnings = page_warnings(&classified, page.weight_criteria.as_ref());
    debug!(page_number, rows = rows.len(), warnings = warnings.len(), "analyzed page");

    Ok(Some(PageAnalysis {
        page_number,
        scale_factor: analysis.scale_factor,
        areas: analysis.areas,
        records: analysis.records,
        rows,
        warnings,
    }))
}

/// Analyze every page of a document in order.
pub fn analyze_document(
    source: &dyn AnnotationSource,
    options: &AnalysisOptions,
) -> Result<DocumentReport, TribsError> {
    let mut report = DocumentReport::default();

    for page_index in 0..source.page_count() {
        let page_number = page_index + 1;
        let annotations = source.annotations(page_index)?;
        match analyze_page(page_number, &annotations, options)? {
            Some(page) => report.pages.push(page),
            None => report.skipped_pages.push(page_number),
        }
    }

    info!(
        backend = source.backend_name(),
        pages = source.page_count(),
        analyzed = report.pages.len(),
        skipped = report.skipped_pages.len(),
        "analyzed document"
    );

    Ok(report)
}

/// Load a PDF with the `lopdf` backend and analyze it.
pub fn analyze_pdf(
    pdf_bytes: &[u8],
    options: &AnalysisOptions,
) -> Result<DocumentReport, TribsError> {
    let source = LopdfSource::from_bytes(pdf_bytes)?;
    analyze_document(&source, options)
}

/// Conditions worth flagging that do not stop the analysis.
fn page_warnings(page: &ClassifiedPage, criteria: Option<&WeightCriteria>) -> Vec<String> {
    let mut warnings = Vec::new();
    let element_count = page.element_count() - page.areas.len();

    if page.is_empty() {
        warnings.push("no area, wall, floor or roof annotations on the page".to_string());
    } else if page.areas.is_empty() {
        warnings.push(format!(
            "{} element(s) drawn but no tributary area (A:) annotation on the page",
            element_count
        ));
    } else if element_count == 0 {
        warnings.push("tributary areas drawn but no wall, floor or roof elements".to_string());
    }

    if let Some(criteria) = criteria {
        let unused = criteria
            .walls
            .keys()
            .filter(|label| !page.walls.contains_key(*label))
            .chain(criteria.floors.keys().filter(|label| !page.floors.contains_key(*label)))
            .chain(criteria.roofs.keys().filter(|label| !page.roofs.contains_key(*label)))
            .cloned()
            .collect::<Vec<_>>();
        if !unused.is_empty() {
            warnings.push(format!(
                "weight criteria defined for labels not drawn on the page: {}",
                unused.join(", ")
            ));
        }
    }

    warnings
}
