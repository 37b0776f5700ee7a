use crate::error::TribsError;
use crate::extraction::AnnotationSource;
use crate::model::RawAnnotation;
use serde::{Deserialize, Serialize};

/// Annotations already extracted from a document, one list per page.
///
/// Serializes as a JSON array of pages, which lets annotation dumps be
/// analyzed again without the original PDF.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemorySource {
    pub pages: Vec<Vec<RawAnnotation>>,
}

impl MemorySource {
    pub fn new(pages: Vec<Vec<RawAnnotation>>) -> Self {
        Self { pages }
    }

    /// Snapshot every page of another source.
    pub fn capture(source: &dyn AnnotationSource) -> Result<Self, TribsError> {
        let pages = (0..source.page_count())
            .map(|i| source.annotations(i))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { pages })
    }
}

impl AnnotationSource for MemorySource {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn annotations(&self, page_index: usize) -> Result<Vec<RawAnnotation>, TribsError> {
        self.pages
            .get(page_index)
            .cloned()
            .ok_or(TribsError::PageOutOfRange {
                index: page_index,
                page_count: self.pages.len(),
            })
    }

    fn backend_name(&self) -> &str {
        "memory"
    }
}
