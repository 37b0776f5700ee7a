use serde::Serialize;
use tribs_core::error::TribsError;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), TribsError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
