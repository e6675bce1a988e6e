use penal_core::error::PenalError;
use penal_core::evaluate::outcome::ArrestCalculation;

pub fn print(calculation: &ArrestCalculation) -> Result<(), PenalError> {
    let json = serde_json::to_string_pretty(calculation)?;
    println!("{json}");
    Ok(())
}
