//! Path commands - add and remove configuration paths

use console::style;

use valhelm_core::PathMetadata;

use crate::adapters;
use crate::error::Result;
use crate::persistence::ConfigFile;

pub fn add(
    file: &ConfigFile,
    path: &str,
    description: Option<String>,
    required: bool,
    sensitive: bool,
) -> Result<()> {
    let _lock = file.lock()?;
    let mut store = file.load(adapters::registry_for(file.path()))?;

    store.add_path(path, PathMetadata::new(description, required, sensitive))?;
    file.save(&store)?;

    println!("{} Added path '{path}'", style("✓").green());
    Ok(())
}

pub fn remove(file: &ConfigFile, path: &str, force: bool) -> Result<()> {
    let _lock = file.lock()?;
    let mut store = file.load(adapters::registry_for(file.path()))?;

    store.remove_path(path, force)?;
    file.save(&store)?;

    println!("{} Removed path '{path}'", style("✓").green());
    Ok(())
}
