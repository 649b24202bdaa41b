//! Convert command handler

use super::utils::{load_document, save_document};
use crate::cli::ConvertArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;
use tracing::{info, instrument};

/// Handle the convert command
#[instrument(skip_all, fields(data = %args.documents.data.display()))]
pub fn handle_convert(args: ConvertArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let data = load_document(&args.documents.data)?;
    let rules = load_document(&args.documents.rules)?;
    let engine = config.engine(&args.engine);

    info!("Converting document");
    let (value, report) = engine.convert_with_report(data, &rules)?;
    info!(nodes = report.nodes, warnings = report.warnings.len(), "Conversion finished");

    for warning in &report.warnings {
        output.warning(warning)?;
    }

    match &args.save_to {
        Some(path) => {
            save_document(path, &value)?;
            output.success(&format!("✓ Converted document saved to {}", path.display()))?;
        }
        None => output.data(&value)?,
    }

    if args.report {
        output.section("Report")?;
        output.report(&report)?;
    }

    Ok(())
}
