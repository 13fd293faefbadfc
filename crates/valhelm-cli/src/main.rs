//! Valhelm CLI - deployment-scoped values and secrets for Helm releases

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod adapters;
mod commands;
mod display;
mod error;
mod exit_codes;
mod persistence;

use error::CliError;
use persistence::ConfigFile;

#[derive(Parser)]
#[command(name = "valhelm")]
#[command(author = "Valhelm Contributors")]
#[command(version)]
#[command(about = "Deployment-scoped values and secrets manager for Helm releases", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file
    #[arg(long, global = true, default_value = "valhelm.json")]
    config: PathBuf,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new configuration for a release
    Init {
        /// Helm release name
        release: String,
    },

    /// Add a configuration path
    AddPath {
        /// Dot-delimited path (e.g. app.replicas)
        path: String,

        /// What this path configures
        #[arg(long)]
        description: Option<String>,

        /// Require a value for every deployment
        #[arg(long)]
        required: bool,

        /// Resolve values through a secret backend
        #[arg(long)]
        sensitive: bool,
    },

    /// Remove a configuration path
    RemovePath {
        path: String,

        /// Also remove any values set for the path
        #[arg(long)]
        force: bool,
    },

    /// Add a deployment (starts with no-backend/no-auth)
    AddDeployment {
        /// Deployment name (e.g. dev, prod)
        name: String,
    },

    /// Remove a deployment that no path references
    RemoveDeployment { name: String },

    /// Attach a secret backend to a deployment
    AttachBackend {
        deployment: String,

        /// Backend kind: no-backend, git-secret, aws, azure, gcp
        backend: String,

        /// Backend settings (key=value, e.g. region=eu-west-1)
        #[arg(long = "set")]
        set: Vec<String>,
    },

    /// Attach an auth method to a deployment
    AttachAuth {
        deployment: String,

        /// Auth type: no-auth, env, file, direct, managed-identity
        #[arg(long = "type")]
        auth_type: String,

        /// Environment variable prefix (env auth)
        #[arg(long)]
        prefix: Option<String>,

        /// Credentials file (file auth)
        #[arg(long)]
        path: Option<PathBuf>,

        /// Inline credential (key=value, repeatable; direct auth)
        #[arg(long = "cred")]
        cred: Vec<String>,
    },

    /// Set a value for a path and deployment
    SetValue {
        path: String,
        deployment: String,
        value: String,
    },

    /// Get a value for a path and deployment
    GetValue {
        path: String,
        deployment: String,

        /// Print the raw secret:// reference instead of resolving it
        #[arg(long)]
        no_resolve: bool,
    },

    /// Remove a value for a path and deployment
    RemoveValue { path: String, deployment: String },

    /// Validate the whole configuration
    Validate,

    /// Generate the values file for a deployment
    Generate {
        deployment: String,

        /// Directory to write <deployment>.<release>.values.yaml into
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,
    },
}

fn main() {
    miette::set_panic_hook();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let file = ConfigFile::new(&cli.config);

    match cli.command {
        Commands::Init { release } => commands::init::run(&file, &release),

        Commands::AddPath {
            path,
            description,
            required,
            sensitive,
        } => commands::path::add(&file, &path, description, required, sensitive),

        Commands::RemovePath { path, force } => commands::path::remove(&file, &path, force),

        Commands::AddDeployment { name } => commands::deployment::add(&file, &name),

        Commands::RemoveDeployment { name } => commands::deployment::remove(&file, &name),

        Commands::AttachBackend {
            deployment,
            backend,
            set,
        } => commands::backend::attach_backend(&file, &deployment, &backend, &set),

        Commands::AttachAuth {
            deployment,
            auth_type,
            prefix,
            path,
            cred,
        } => commands::backend::attach_auth(&file, &deployment, &auth_type, prefix, path, &cred),

        Commands::SetValue {
            path,
            deployment,
            value,
        } => commands::value::set(&file, &path, &deployment, &value),

        Commands::GetValue {
            path,
            deployment,
            no_resolve,
        } => commands::value::get(&file, &path, &deployment, no_resolve),

        Commands::RemoveValue { path, deployment } => {
            commands::value::remove(&file, &path, &deployment)
        }

        Commands::Validate => commands::validate::run(&file),

        Commands::Generate {
            deployment,
            output_dir,
        } => commands::generate::run(&file, &deployment, &output_dir),
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
