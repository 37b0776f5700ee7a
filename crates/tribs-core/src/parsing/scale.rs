use crate::error::TribsError;

/// Returned for an empty or absent label. Not a calibration in itself:
/// whether a page is calibrated is decided by the presence of the
/// `SCALE` annotation, never by this value.
pub const DEFAULT_SCALE_INCHES: f64 = 1.0;

/// Parse a calibration label into inches.
///
/// Accepts `<feet>'-<inches>"` where either part may be omitted:
/// - `1'-6"` -> 18
/// - `2'` -> 24
/// - `9"` -> 9
/// - `'-6"` -> 6
/// - `` (empty) -> [`DEFAULT_SCALE_INCHES`]
pub fn parse_scale_inches(label: Option<&str>) -> Result<f64, TribsError> {
    let text = match label.map(str::trim) {
        None | Some("") => return Ok(DEFAULT_SCALE_INCHES),
        Some(t) => t,
    };

    let (feet_part, rest) = match text.find('\'') {
        Some(idx) => (&text[..idx], &text[idx + 1..]),
        None => ("", text),
    };

    let rest = rest.trim_start();
    let rest = rest.strip_prefix('-').unwrap_or(rest).trim();

    let inches_part = if rest.is_empty() {
        ""
    } else {
        rest.strip_suffix('"')
            .ok_or_else(|| scale_error(text, "inches must end with '\"'"))?
    };

    let feet = parse_component(text, feet_part, "feet")?;
    let inches = parse_component(text, inches_part, "inches")?;

    Ok(feet * 12.0 + inches)
}

/// Parse one numeric component. An empty component counts as zero.
fn parse_component(input: &str, part: &str, what: &str) -> Result<f64, TribsError> {
    let part = part.trim();
    if part.is_empty() {
        return Ok(0.0);
    }
    let value: f64 = part
        .parse()
        .map_err(|_| scale_error(input, &format!("'{part}' is not a number of {what}")))?;
    if !value.is_finite() || value < 0.0 {
        return Err(scale_error(
            input,
            &format!("{what} must be a non-negative number, got '{part}'"),
        ));
    }
    Ok(value)
}

fn scale_error(input: &str, reason: &str) -> TribsError {
    TribsError::ScaleParse {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}
