pub mod analyze;
pub mod annotations;
pub mod criteria;
pub mod scale;

use std::path::Path;
use tribs_core::error::TribsError;
use tribs_core::extraction::memory::MemorySource;
use tribs_core::extraction::pdf::LopdfSource;
use tribs_core::extraction::AnnotationSource;

/// Open a PDF, or an annotation dump when the file ends in `.json`.
pub fn open_source(path: &Path) -> Result<Box<dyn AnnotationSource>, TribsError> {
    let is_json = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let bytes = std::fs::read(path)?;
    if is_json {
        let source: MemorySource = serde_json::from_slice(&bytes)?;
        Ok(Box::new(source))
    } else {
        Ok(Box::new(LopdfSource::from_bytes(&bytes)?))
    }
}
