//! CLI help and command-name contract for logging and routing.

use crate::cli::parse::Commands;

/// Command name string recorded in log events (e.g. "build", "manifest").
pub fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Build { .. } => "build",
        Commands::Discover { .. } => "discover",
        Commands::Manifest { .. } => "manifest",
        Commands::Validate => "validate",
        Commands::Init { .. } => "init",
    }
}

/// Whether the command needs a loaded project configuration.
pub fn needs_config(command: &Commands) -> bool {
    !matches!(command, Commands::Init { .. })
}
