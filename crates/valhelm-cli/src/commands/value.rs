//! Value commands - set, get and remove values

use console::style;
use serde_json::Value as JsonValue;

use crate::adapters;
use crate::error::Result;
use crate::persistence::ConfigFile;

pub fn set(file: &ConfigFile, path: &str, deployment: &str, raw: &str) -> Result<()> {
    let _lock = file.lock()?;
    let mut store = file.load(adapters::registry_for(file.path()))?;

    store.set_value(path, deployment, parse_scalar(raw))?;
    file.save(&store)?;

    println!(
        "{} Set value for path '{path}' in deployment '{deployment}'",
        style("✓").green()
    );
    Ok(())
}

pub fn get(file: &ConfigFile, path: &str, deployment: &str, no_resolve: bool) -> Result<()> {
    let _lock = file.lock()?;
    let store = file.load(adapters::registry_for(file.path()))?;

    let value = store.get_value(path, deployment, !no_resolve)?;
    match value {
        JsonValue::String(s) => println!("{s}"),
        other => println!("{other}"),
    }
    Ok(())
}

pub fn remove(file: &ConfigFile, path: &str, deployment: &str) -> Result<()> {
    let _lock = file.lock()?;
    let mut store = file.load(adapters::registry_for(file.path()))?;

    store.remove_value(path, deployment)?;
    file.save(&store)?;

    println!(
        "{} Removed value for path '{path}' in deployment '{deployment}'",
        style("✓").green()
    );
    Ok(())
}

/// Parse a command-line value into a configuration scalar.
///
/// `true`/`false`/`null` and numbers get their JSON types; everything else
/// stays a string.
pub(crate) fn parse_scalar(raw: &str) -> JsonValue {
    if raw == "true" {
        JsonValue::Bool(true)
    } else if raw == "false" {
        JsonValue::Bool(false)
    } else if raw == "null" {
        JsonValue::Null
    } else if let Ok(num) = raw.parse::<i64>() {
        JsonValue::Number(num.into())
    } else if let Ok(num) = raw.parse::<f64>() {
        serde_json::Number::from_f64(num)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(raw.to_string()))
    } else {
        JsonValue::String(raw.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalar() {
        assert_eq!(parse_scalar("true"), JsonValue::Bool(true));
        assert_eq!(parse_scalar("false"), JsonValue::Bool(false));
        assert_eq!(parse_scalar("null"), JsonValue::Null);
        assert_eq!(parse_scalar("3"), JsonValue::from(3));
        assert_eq!(parse_scalar("2.5"), JsonValue::from(2.5));
        assert_eq!(parse_scalar("nginx"), JsonValue::from("nginx"));
        assert_eq!(parse_scalar("1.0.0"), JsonValue::from("1.0.0"));
    }
}
