use tribs_core::error::TribsError;
use tribs_core::parsing::parse_scale_inches;

pub fn run(text: &str) -> Result<(), TribsError> {
    let inches = parse_scale_inches(Some(text))?;
    println!("{inches} in ({:.4} ft)", inches / 12.0);
    Ok(())
}
