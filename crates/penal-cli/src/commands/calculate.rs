use penal_core::error::PenalError;
use penal_core::{CalculationOptions, CalculationRequest, NeverEligible};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::output;

pub struct CalculateArgs {
    pub request: PathBuf,
    pub codes: Option<PathBuf>,
    pub preset: Option<String>,
    pub additions: Option<PathBuf>,
    pub parole: bool,
    pub options: CalculationOptions,
    pub output: String,
    pub verbose: bool,
}

pub fn run(args: CalculateArgs) -> Result<(), PenalError> {
    let table = super::load_table(args.codes.as_deref(), args.preset.as_deref())?;
    let catalog = super::load_catalog(args.additions.as_deref())?;

    let mut request = read_request(&args.request)?;
    if args.parole {
        request.is_parole_violator = true;
    }

    info!(
        code = table.name(),
        charges = request.report.len(),
        parole = request.is_parole_violator,
        stacking = %args.options.stacking,
        "calculating report"
    );

    let calculation =
        penal_core::calculate_request(&request, &table, &catalog, &args.options, &NeverEligible);

    match args.output.as_str() {
        "json" => output::json::print(&calculation)?,
        _ => output::table::print(&calculation, &args.options, args.verbose),
    }

    Ok(())
}

/// Read a request body from a file, or from stdin when the path is `-`.
fn read_request(path: &Path) -> Result<CalculationRequest, PenalError> {
    let body = if path == Path::new("-") {
        let mut body = String::new();
        std::io::stdin().read_to_string(&mut body)?;
        body
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&body)?)
}
