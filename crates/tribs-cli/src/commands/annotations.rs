use std::path::PathBuf;
use tribs_core::error::TribsError;
use tribs_core::extraction::memory::MemorySource;
use tribs_core::normalize::normalize_page;

use crate::commands::open_source;
use crate::output;

pub fn run(input_file: PathBuf, output_format: &str, raw: bool) -> Result<(), TribsError> {
    let source = open_source(&input_file)?;

    if raw {
        // Always JSON: the dump is meant to be fed back into `tribs analyze`.
        let dump = MemorySource::capture(source.as_ref())?;
        return output::json::print(&dump);
    }

    let mut pages = Vec::new();
    let mut skipped = Vec::new();
    for page_index in 0..source.page_count() {
        let annotations = source.annotations(page_index)?;
        match normalize_page(page_index + 1, &annotations)? {
            Some(page) => pages.push(page),
            None => skipped.push(page_index + 1),
        }
    }

    match output_format {
        "json" => output::json::print(&pages)?,
        _ => output::table::print_pages(&pages, &skipped),
    }

    Ok(())
}
