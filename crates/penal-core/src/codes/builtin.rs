use crate::codes::{parse_legal_code_str, LegalCodeTable};
use crate::error::PenalError;

const SAMPLE_PENAL_CODE_JSON: &str = include_str!("../../../../codes/sample-penal-code.json");

/// Available predefined legal codes.
pub const PRESETS: &[&str] = &["sample"];

/// Preset used when the caller names none.
pub const DEFAULT_PRESET: &str = "sample";

/// Load a predefined legal code by name.
pub fn load_preset(name: &str) -> Result<LegalCodeTable, PenalError> {
    match name {
        "sample" => parse_legal_code_str(SAMPLE_PENAL_CODE_JSON),
        _ => Err(PenalError::UnknownPreset {
            name: name.to_string(),
            available: PRESETS.join(", "),
        }),
    }
}
