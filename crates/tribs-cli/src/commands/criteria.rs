use std::path::Path;
use tribs_core::error::TribsError;
use tribs_core::parsing::parse_weight_criteria;

use crate::output;

pub fn run(file: &Path, output_format: &str) -> Result<(), TribsError> {
    let text = std::fs::read_to_string(file)?;
    let criteria = parse_weight_criteria(&text)?;

    match output_format {
        "json" => output::json::print(&criteria)?,
        _ => output::table::print_criteria(&criteria),
    }

    Ok(())
}
