use crate::classify::DuplicatePolicy;
use crate::error::TribsError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Knobs for an analysis run. Every field has a default, so `{}` is a valid
/// options file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisOptions {
    /// How to treat two elements of one type with the same label on a page.
    pub duplicate_policy: DuplicatePolicy,
    /// Keep report rows for area/element pairs that do not overlap.
    pub include_empty_rows: bool,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Overwrite,
            include_empty_rows: true,
        }
    }
}

/// Load analysis options from a JSON file.
pub fn load_options(path: &Path) -> Result<AnalysisOptions, TribsError> {
    let content = std::fs::read_to_string(path).map_err(|e| TribsError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| TribsError::ConfigLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Parse analysis options from a JSON string (no file path context).
pub fn parse_options_str(json: &str) -> Result<AnalysisOptions, TribsError> {
    Ok(serde_json::from_str(json)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_object_uses_defaults() {
        let opts = parse_options_str("{}").unwrap();
        assert_eq!(opts.duplicate_policy, DuplicatePolicy::Overwrite);
        assert!(opts.include_empty_rows);
    }

    #[test]
    fn test_parse_all_fields() {
        let opts = parse_options_str(
            r#"{ "duplicate_policy": "reject_duplicate", "include_empty_rows": false }"#,
        )
        .unwrap();
        assert_eq!(opts.duplicate_policy, DuplicatePolicy::RejectDuplicate);
        assert!(!opts.include_empty_rows);
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(parse_options_str(r#"{ "scale": 2 }"#).is_err());
    }

    #[test]
    fn test_unknown_policy_rejected() {
        assert!(parse_options_str(r#"{ "duplicate_policy": "merge" }"#).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "include_empty_rows": false }}"#).unwrap();
        let opts = load_options(file.path()).unwrap();
        assert!(!opts.include_empty_rows);
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_options(Path::new("/nonexistent/tribs-options.json")).unwrap_err();
        assert!(matches!(err, TribsError::ConfigLoad { .. }));
    }
}
