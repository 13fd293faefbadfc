//! Validate command - run the whole-store validation pass

use crate::adapters;
use crate::display;
use crate::error::{CliError, Result};
use crate::persistence::ConfigFile;

pub fn run(file: &ConfigFile) -> Result<()> {
    let _lock = file.lock()?;
    let store = file.load(adapters::registry_for(file.path()))?;

    let report = store.validate();
    display::print_validation_report(&report);

    if !report.is_valid() {
        return Err(CliError::ValidationFailed {
            count: report.len(),
        });
    }
    Ok(())
}
