//! Backend commands - attach a secret backend or auth method to a deployment

use console::style;
use indexmap::IndexMap;
use std::path::PathBuf;

use valhelm_backend::{AuthMethod, BackendKind};

use crate::adapters;
use crate::commands::value::parse_scalar;
use crate::error::{CliError, Result};
use crate::persistence::ConfigFile;

const BACKEND_KINDS: &str = "no-backend, git-secret, aws, azure, gcp";
const AUTH_TYPES: &str = "no-auth, env, file, direct, managed-identity";

pub fn attach_backend(
    file: &ConfigFile,
    deployment: &str,
    backend: &str,
    set: &[String],
) -> Result<()> {
    let kind = BackendKind::parse(backend).ok_or_else(|| {
        CliError::usage(format!(
            "Unknown backend '{backend}' (expected one of: {BACKEND_KINDS})"
        ))
    })?;

    let mut config = IndexMap::new();
    for arg in set {
        let (key, value) = split_key_value(arg)?;
        config.insert(key.to_string(), parse_scalar(value));
    }

    let _lock = file.lock()?;
    let mut store = file.load(adapters::registry_for(file.path()))?;

    store.attach_backend(deployment, kind, config)?;
    file.save(&store)?;

    println!(
        "{} Attached backend '{kind}' to deployment '{deployment}'",
        style("✓").green()
    );
    Ok(())
}

pub fn attach_auth(
    file: &ConfigFile,
    deployment: &str,
    auth_type: &str,
    prefix: Option<String>,
    auth_path: Option<PathBuf>,
    credentials: &[String],
) -> Result<()> {
    let auth = build_auth(auth_type, prefix, auth_path, credentials)?;
    let variant = auth.variant();

    let _lock = file.lock()?;
    let mut store = file.load(adapters::registry_for(file.path()))?;

    store.attach_auth(deployment, auth)?;
    file.save(&store)?;

    println!(
        "{} Attached auth '{variant}' to deployment '{deployment}'",
        style("✓").green()
    );
    Ok(())
}

fn build_auth(
    auth_type: &str,
    prefix: Option<String>,
    auth_path: Option<PathBuf>,
    credentials: &[String],
) -> Result<AuthMethod> {
    match auth_type {
        "no-auth" => Ok(AuthMethod::NoAuth),
        "env" => Ok(AuthMethod::Env {
            prefix: prefix
                .ok_or_else(|| CliError::usage("--prefix is required for env auth"))?,
        }),
        "file" => Ok(AuthMethod::File {
            path: auth_path
                .ok_or_else(|| CliError::usage("--path is required for file auth"))?,
        }),
        "direct" => {
            if credentials.is_empty() {
                return Err(CliError::usage(
                    "at least one --cred key=value is required for direct auth",
                ));
            }
            let mut map = IndexMap::new();
            for arg in credentials {
                let (key, value) = split_key_value(arg)?;
                map.insert(key.to_string(), value.to_string());
            }
            Ok(AuthMethod::Direct { credentials: map })
        }
        "managed-identity" | "managed_identity" => Ok(AuthMethod::ManagedIdentity),
        other => Err(CliError::usage(format!(
            "Unknown auth type '{other}' (expected one of: {AUTH_TYPES})"
        ))),
    }
}

fn split_key_value(arg: &str) -> Result<(&str, &str)> {
    arg.split_once('=')
        .ok_or_else(|| CliError::usage(format!("Invalid format: '{arg}'. Expected key=value")))
}
