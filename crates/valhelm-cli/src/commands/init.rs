//! Init command - create a new configuration for a release

use console::style;

use valhelm_core::ConfigStore;

use crate::error::{CliError, Result};
use crate::persistence::ConfigFile;

pub fn run(file: &ConfigFile, release: &str) -> Result<()> {
    let _lock = file.lock()?;

    if file.exists() {
        return Err(CliError::config(format!(
            "Configuration file {} already exists",
            file.path().display()
        )));
    }

    let store = ConfigStore::new(release)?;
    file.save(&store)?;

    println!(
        "{} Initialized configuration for release '{release}'",
        style("✓").green()
    );
    Ok(())
}
