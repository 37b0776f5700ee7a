use std::path::PathBuf;
use tribs_core::classify::DuplicatePolicy;
use tribs_core::config::{self, AnalysisOptions};
use tribs_core::error::TribsError;

use crate::commands::open_source;
use crate::output;

pub struct AnalyzeArgs {
    pub input_file: PathBuf,
    pub output_format: String,
    pub config: Option<PathBuf>,
    pub out: Option<PathBuf>,
    pub show_intersections: bool,
    pub reject_duplicates: bool,
    pub nonzero_only: bool,
}

pub fn run(args: AnalyzeArgs) -> Result<(), TribsError> {
    let mut options = match &args.config {
        Some(path) => config::load_options(path)?,
        None => AnalysisOptions::default(),
    };
    // Flags only tighten what the options file says.
    if args.reject_duplicates {
        options.duplicate_policy = DuplicatePolicy::RejectDuplicate;
    }
    if args.nonzero_only {
        options.include_empty_rows = false;
    }

    let source = open_source(&args.input_file)?;
    let report = tribs_core::analyze_document(source.as_ref(), &options)?;

    if let Some(path) = &args.out {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)?;
        eprintln!(
            "Analyzed {} page(s), written to {}",
            report.pages.len(),
            path.display()
        );
    }

    match args.output_format.as_str() {
        "json" => output::json::print(&report)?,
        _ => output::table::print_report(&report, args.show_intersections),
    }

    Ok(())
}
