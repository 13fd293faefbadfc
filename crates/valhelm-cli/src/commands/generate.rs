//! Generate command - render the values file for a deployment

use console::style;
use std::fs;
use std::path::Path;

use crate::adapters;
use crate::error::{CliError, Result};
use crate::persistence::ConfigFile;

pub fn run(file: &ConfigFile, deployment: &str, output_dir: &Path) -> Result<()> {
    let _lock = file.lock()?;
    let store = file.load(adapters::registry_for(file.path()))?;

    let rendered = store.render(deployment)?;

    fs::create_dir_all(output_dir)?;
    let filename = format!("{deployment}.{}.values.yaml", store.release());
    let output_path = output_dir.join(&filename);
    fs::write(&output_path, rendered.to_yaml().map_err(CliError::from)?)?;

    println!(
        "{} Generated values file for deployment '{deployment}' at {}",
        style("✓").green(),
        output_path.display()
    );
    Ok(())
}
