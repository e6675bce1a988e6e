pub mod additions;
pub mod calculate;
pub mod codes;

use penal_core::additions::{self as catalog, AdditionCatalog};
use penal_core::codes::{builtin, load_legal_code, LegalCodeTable};
use penal_core::error::PenalError;
use std::path::Path;

/// Legal code from `--codes`, else `--preset`, else the default preset.
pub(crate) fn load_table(
    codes_file: Option<&Path>,
    preset: Option<&str>,
) -> Result<LegalCodeTable, PenalError> {
    match codes_file {
        Some(path) => load_legal_code(path),
        None => builtin::load_preset(preset.unwrap_or(builtin::DEFAULT_PRESET)),
    }
}

pub(crate) fn load_catalog(path: Option<&Path>) -> Result<AdditionCatalog, PenalError> {
    match path {
        Some(path) => catalog::load_catalog(path),
        None => catalog::builtin_catalog(),
    }
}
