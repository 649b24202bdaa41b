//! Check command handler

use super::utils::load_document;
use crate::cli::{CheckArgs, EngineArgs, OutputFormat};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use tracing::instrument;

/// Handle the check command.
///
/// Fatal conversion errors are always routed back here so they can be
/// reported, so `--traceback` is implied.
#[instrument(skip_all, fields(data = %args.documents.data.display()))]
pub fn handle_check(args: CheckArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let data = load_document(&args.documents.data)?;
    let rules = load_document(&args.documents.rules)?;
    let engine = config.engine(&EngineArgs {
        keep_hidden: false,
        logging: args.logging,
        traceback: true,
    });

    let report = match engine.convert_with_report(data, &rules) {
        Ok((_, report)) => report,
        Err(e) => {
            output.error(&format!("✗ {} does not satisfy {}", args.documents.data.display(), args.documents.rules.display()))?;
            return Err(e.into());
        }
    };

    for warning in &report.warnings {
        output.warning(warning)?;
    }
    if args.deny_warnings && !report.warnings.is_empty() {
        output.error("✗ Warnings are not allowed")?;
        return Err(Error::other(format!(
            "Check failed with {} warning(s)",
            report.warnings.len()
        )));
    }

    if output.format() == OutputFormat::Human {
        output.success(&format!(
            "✓ {} satisfies {}",
            args.documents.data.display(),
            args.documents.rules.display()
        ))?;
        output.info(&format!("{} node(s) checked", report.nodes))?;
    } else {
        output.report(&report)?;
    }

    Ok(())
}
