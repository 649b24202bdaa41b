//! Types command handler

use crate::cli::OutputFormat;
use crate::config::Config;
use crate::error::Result;
use crate::output::OutputWriter;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Registries<'a> {
    data_types: Vec<&'a str>,
    var_types: Vec<&'a str>,
    transforms: Vec<&'a str>,
}

/// Handle the types command
pub fn handle_types(config: &Config, output: &mut OutputWriter) -> Result<()> {
    let engine = config.engine(&Default::default());
    let registries = Registries {
        data_types: engine.data_type_names(),
        var_types: engine.var_type_names(),
        transforms: engine.transform_names(),
    };

    if output.format() != OutputFormat::Human {
        return output.data(&registries);
    }

    let sections = [
        ("Data Types", &registries.data_types),
        ("Variable Types", &registries.var_types),
        ("Transforms", &registries.transforms),
    ];
    for (title, names) in sections {
        output.section(title)?;
        for name in names.iter() {
            output.writeln(&format!("  {}", name))?;
        }
    }
    Ok(())
}
