use crate::error::TribsError;
use crate::extraction::AnnotationSource;
use crate::model::{AnnotationSubtype, RawAnnotation};
use lopdf::{Dictionary, Document, Object, ObjectId};

/// Annotation backend reading PDF bytes with `lopdf`.
///
/// Line geometry comes from `/L`, polyline and polygon geometry from
/// `/Vertices`. `/Subj` and `/Contents` are decoded as PDF text strings.
pub struct LopdfSource {
    doc: Document,
    page_ids: Vec<ObjectId>,
}

impl LopdfSource {
    pub fn from_bytes(pdf_bytes: &[u8]) -> Result<Self, TribsError> {
        let doc = Document::load_mem(pdf_bytes)
            .map_err(|e| TribsError::Pdf(format!("PDF parse error: {}", e)))?;
        // get_pages is keyed by 1-based page number, so values come out in page order.
        let page_ids = doc.get_pages().into_values().collect();
        Ok(Self { doc, page_ids })
    }

    fn resolve<'a>(&'a self, obj: &'a Object) -> Result<&'a Object, TribsError> {
        match obj {
            Object::Reference(id) => self.doc.get_object(*id).map_err(|e| {
                TribsError::Pdf(format!("Failed to resolve reference {:?}: {}", id, e))
            }),
            other => Ok(other),
        }
    }

    fn read_annotation(&self, dict: &Dictionary) -> Result<RawAnnotation, TribsError> {
        let subtype = match dict.get(b"Subtype") {
            Ok(obj) => match self.resolve(obj)?.as_name() {
                Ok(name) => AnnotationSubtype::from_pdf_name(&String::from_utf8_lossy(name)),
                Err(_) => AnnotationSubtype::Other,
            },
            Err(_) => AnnotationSubtype::Other,
        };

        let coords_key: &[u8] = match subtype {
            AnnotationSubtype::Line => b"L",
            _ => b"Vertices",
        };
        let coords = match dict.get(coords_key) {
            Ok(obj) => self.read_numbers(obj)?,
            Err(_) => Vec::new(),
        };

        let rotation = match dict.get(b"Rotation") {
            Ok(obj) => self.read_number(obj)?,
            Err(_) => 0.0,
        };

        Ok(RawAnnotation {
            subtype,
            subject: self.read_text(dict, b"Subj")?,
            contents: self.read_text(dict, b"Contents")?,
            coords,
            rotation,
        })
    }

    fn read_text(&self, dict: &Dictionary, key: &[u8]) -> Result<Option<String>, TribsError> {
        let Ok(obj) = dict.get(key) else {
            return Ok(None);
        };
        match self.resolve(obj)? {
            Object::String(bytes, _) => Ok(Some(decode_text_string(bytes))),
            _ => Ok(None),
        }
    }

    fn read_numbers(&self, obj: &Object) -> Result<Vec<f64>, TribsError> {
        let array = self
            .resolve(obj)?
            .as_array()
            .map_err(|_| TribsError::Pdf("coordinate entry is not an array".into()))?;
        array.iter().map(|item| self.read_number(item)).collect()
    }

    fn read_number(&self, obj: &Object) -> Result<f64, TribsError> {
        match self.resolve(obj)? {
            Object::Integer(i) => Ok(*i as f64),
            Object::Real(r) => Ok(*r as f64),
            other => Err(TribsError::Pdf(format!("expected a number, got {:?}", other))),
        }
    }
}

impl AnnotationSource for LopdfSource {
    fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    fn annotations(&self, page_index: usize) -> Result<Vec<RawAnnotation>, TribsError> {
        let page_id = *self
            .page_ids
            .get(page_index)
            .ok_or(TribsError::PageOutOfRange {
                index: page_index,
                page_count: self.page_ids.len(),
            })?;

        let page = self
            .doc
            .get_object(page_id)
            .and_then(Object::as_dict)
            .map_err(|e| TribsError::Pdf(format!("Failed to get page object: {}", e)))?;

        let Ok(annots) = page.get(b"Annots") else {
            return Ok(Vec::new());
        };
        let annots = self
            .resolve(annots)?
            .as_array()
            .map_err(|_| TribsError::Pdf("/Annots is not an array".into()))?;

        let mut out = Vec::with_capacity(annots.len());
        for annot in annots {
            // Skip entries that are not dictionaries (null or dangling refs).
            if let Ok(dict) = self.resolve(annot)?.as_dict() {
                out.push(self.read_annotation(dict)?);
            }
        }
        Ok(out)
    }

    fn backend_name(&self) -> &str {
        "lopdf"
    }
}

/// Decode a PDF text string: UTF-16BE with BOM, UTF-8 with BOM, or
/// PDFDocEncoding (treated as Latin-1).
fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    if let Some(utf8) = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]) {
        return String::from_utf8_lossy(utf8).into_owned();
    }
    bytes.iter().map(|&b| b as char).collect()
}
