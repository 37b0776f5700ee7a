pub mod memory;
pub mod pdf;

use crate::error::TribsError;
use crate::model::RawAnnotation;

/// Read access to a document's pages and their annotations.
pub trait AnnotationSource: Send + Sync {
    fn page_count(&self) -> usize;

    /// Annotations of one page (0-based index), in document order.
    /// A page without annotations yields an empty list.
    fn annotations(&self, page_index: usize) -> Result<Vec<RawAnnotation>, TribsError>;

    /// Name of this backend (for diagnostics).
    fn backend_name(&self) -> &str;
}
