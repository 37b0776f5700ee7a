use std::collections::BTreeMap;
use tribs_core::model::{CriteriaEntry, NormalizedPage, WeightCriteria};
use tribs_core::report::ReportRow;
use tribs_core::{DocumentReport, PageAnalysis};

pub fn print_report(report: &DocumentReport, show_intersections: bool) {
    if report.pages.is_empty() {
        println!("No scaled pages found (add a SCALE line annotation to each sheet).");
    }

    for (i, page) in report.pages.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_page(page, show_intersections);
    }

    if !report.skipped_pages.is_empty() {
        let numbers: Vec<String> = report.skipped_pages.iter().map(|n| n.to_string()).collect();
        println!("\nSkipped page(s): {}", numbers.join(", "));
    }

    if report.pages.len() > 1 {
        println!("\nTotal weight, all pages: {:.1} lb", report.total_weight());
    }
}

fn print_page(page: &PageAnalysis, show_intersections: bool) {
    println!(
        "=== Page {} (scale {:.4} in/unit) ===\n",
        page.page_number,
        page.scale_factor.value()
    );

    if page.rows.is_empty() {
        println!("  No rows.\n");
    } else {
        print_rows(&page.rows);
    }

    if show_intersections {
        for record in page.records.iter().filter(|r| !r.shapes.is_empty()) {
            println!(
                "  {} / {} {}: {} shape(s), {:.3}",
                record.area_label,
                record.element_type,
                record.element_label,
                record.shapes.len(),
                record.total
            );
            for shape in &record.shapes {
                let points: Vec<String> = shape
                    .document_coords
                    .iter()
                    .map(|(x, y)| format!("({x:.1}, {y:.1})"))
                    .collect();
                println!("    {:.3} at {}", shape.value, points.join(" "));
            }
        }
        println!();
    }

    for warning in &page.warnings {
        println!("  warning: {warning}");
    }
}

fn print_rows(rows: &[ReportRow]) {
    let region_w = column_width(rows.iter().map(|r| r.region.len()), "Region");
    let label_w = column_width(rows.iter().map(|r| r.element_label.len()), "Label");

    println!(
        "  {:<region_w$}  {:<5}  {:<label_w$}  {:>7}  {:>7}  {:>7}  {:>9}  {:>10}  {:>12}",
        "Region", "Type", "Label", "Height", "Weight", "Snow", "Length", "Area", "Total"
    );
    for row in rows {
        println!(
            concat!(
                "  {:<region_w$}  {:<5}  {:<label_w$}  {:>7.2}  {:>7.2}  {:>7.2}",
                "  {:>9.3}  {:>10.3}  {:>12.1}"
            ),
            row.region,
            row.element_type.to_string(),
            row.element_label,
            row.height,
            row.weight,
            row.snow_weight,
            row.length,
            row.area,
            row.total_weight,
            region_w = region_w,
            label_w = label_w,
        );
    }

    let total: f64 = rows.iter().map(|r| r.total_weight).sum();
    println!("\n  Page total: {total:.1} lb\n");
}

fn column_width(lengths: impl Iterator<Item = usize>, heading: &str) -> usize {
    lengths.max().unwrap_or(0).max(heading.len())
}

pub fn print_pages(pages: &[NormalizedPage], skipped: &[usize]) {
    for page in pages {
        println!(
            "=== Page {} (scale {:.4} in/unit) ===\n",
            page.page_number,
            page.scale_factor.value()
        );
        for annotation in &page.annotations {
            println!(
                "  {:<9} {:<30} {} point(s)",
                annotation.subtype.to_string(),
                annotation.subject.as_deref().unwrap_or("-"),
                annotation.coords.len()
            );
        }
        match &page.weight_criteria {
            Some(criteria) => {
                println!();
                print_criteria(criteria);
            }
            None => println!("\n  No weight criteria on this page.\n"),
        }
    }

    if !skipped.is_empty() {
        let numbers: Vec<String> = skipped.iter().map(|n| n.to_string()).collect();
        println!("Skipped page(s): {}", numbers.join(", "));
    }
}

pub fn print_criteria(criteria: &WeightCriteria) {
    if criteria.is_empty() {
        println!("  (no criteria entries)");
        return;
    }
    print_category("Roofs", &criteria.roofs);
    print_category("Floors", &criteria.floors);
    print_category("Walls", &criteria.walls);
}

fn print_category(name: &str, entries: &BTreeMap<String, CriteriaEntry>) {
    if entries.is_empty() {
        return;
    }
    println!("  {name}:");
    for (label, entry) in entries {
        let mut parts = Vec::new();
        if let Some(w) = entry.weight {
            parts.push(format!("weight {w} psf"));
        }
        if let Some(h) = entry.height {
            parts.push(format!("height {h} ft"));
        }
        if let Some(s) = entry.snow {
            parts.push(format!("snow {s} psf"));
        }
        println!("    {label}: {}", parts.join(", "));
    }
    println!();
}
