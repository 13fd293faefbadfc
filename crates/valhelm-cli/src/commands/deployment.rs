//! Deployment commands - add and remove deployments

use console::style;

use crate::adapters;
use crate::error::Result;
use crate::persistence::ConfigFile;

pub fn add(file: &ConfigFile, name: &str) -> Result<()> {
    let _lock = file.lock()?;
    let mut store = file.load(adapters::registry_for(file.path()))?;

    store.add_deployment(name)?;
    file.save(&store)?;

    println!("{} Added deployment '{name}'", style("✓").green());
    Ok(())
}

pub fn remove(file: &ConfigFile, name: &str) -> Result<()> {
    let _lock = file.lock()?;
    let mut store = file.load(adapters::registry_for(file.path()))?;

    store.remove_deployment(name)?;
    file.save(&store)?;

    println!("{} Removed deployment '{name}'", style("✓").green());
    Ok(())
}
