use crate::error::TribsError;
use crate::model::{CriteriaEntry, ElementType, WeightCriteria};

/// Separates the category sections of a criteria block.
pub const SECTION_MARKER: &str = "===";

/// Line prefixes that open a new labelled parameter set.
const LABEL_PREFIXES: [&str; 3] = ["R:", "F:", "W:"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parameter {
    Weight,
    Height,
    Snow,
}

impl Parameter {
    /// Checked in this order; the first key found on a line wins.
    const ALL: [(Parameter, &'static str); 3] = [
        (Parameter::Weight, "Weight:"),
        (Parameter::Height, "Height:"),
        (Parameter::Snow, "Snow:"),
    ];

    fn detect(line: &str) -> Option<Parameter> {
        Self::ALL
            .iter()
            .find(|(_, key)| line.contains(key))
            .map(|(p, _)| *p)
    }

    fn assign(self, entry: &mut CriteriaEntry, value: f64) {
        match self {
            Parameter::Weight => entry.weight = Some(value),
            Parameter::Height => entry.height = Some(value),
            Parameter::Snow => entry.snow = Some(value),
        }
    }
}

/// Parse an "EFFECTIVE SEISMIC WEIGHT CRITERIA" text block.
///
/// ```text
/// ===Walls
/// W: W1
/// Weight: 15 psf
/// Height: 10 ft
/// ===Roofs
/// R: R1
/// Weight: 20 psf
/// Snow: 25 psf
/// ```
///
/// Text before the first `===` is ignored. Each section's first line names
/// the category (`Roofs`, `Floors`, anything else is `Walls`).
pub fn parse_weight_criteria(text: &str) -> Result<WeightCriteria, TribsError> {
    let text = text.replace('\r', "\n");
    let mut criteria = WeightCriteria::default();

    for (section_idx, section) in text.trim().split(SECTION_MARKER).enumerate().skip(1) {
        let mut lines = section.trim().split('\n');
        let heading = lines.next().unwrap_or_default();
        let entries = match section_category(heading) {
            ElementType::Roof => &mut criteria.roofs,
            ElementType::Floor => &mut criteria.floors,
            _ => &mut criteria.walls,
        };

        let mut current: Option<String> = None;

        for line in lines {
            if let Some(label) = declared_label(line) {
                entries.insert(label.clone(), CriteriaEntry::default());
                current = Some(label);
                continue;
            }

            let Some(parameter) = Parameter::detect(line) else {
                continue;
            };

            let label = current
                .as_ref()
                .ok_or_else(|| TribsError::CriteriaKeyWithoutLabel {
                    section: section_idx,
                    line: line.to_string(),
                })?;
            let value = parse_value(section_idx, line)?;
            if let Some(entry) = entries.get_mut(label) {
                parameter.assign(entry, value);
            }
        }
    }

    Ok(criteria)
}

fn section_category(heading: &str) -> ElementType {
    if heading.contains("Roofs") {
        ElementType::Roof
    } else if heading.contains("Floors") {
        ElementType::Floor
    } else {
        ElementType::Wall
    }
}

/// `W: W1` -> `W1`. The label is everything after the first colon.
fn declared_label(line: &str) -> Option<String> {
    if !LABEL_PREFIXES.iter().any(|p| line.starts_with(p)) {
        return None;
    }
    line.split_once(':').map(|(_, rest)| rest.trim().to_string())
}

/// The value is the first token after the line's first colon.
fn parse_value(section: usize, line: &str) -> Result<f64, TribsError> {
    let value_error = |reason: String| TribsError::CriteriaValue {
        section,
        line: line.to_string(),
        reason,
    };

    let token = line
        .split_once(':')
        .and_then(|(_, rest)| rest.split_whitespace().next())
        .ok_or_else(|| value_error("missing number".into()))?;

    let value: f64 = token
        .parse()
        .map_err(|_| value_error(format!("'{token}' is not a number")))?;
    if !value.is_finite() {
        return Err(value_error(format!("'{token}' is not finite")));
    }
    Ok(value)
}
