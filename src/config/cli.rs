use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "libsys-deploy")]
#[command(about = "Deploy the Library Management System API to production")]
pub struct CliConfig {
    /// Path to a TOML config file (defaults to deploy.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Working directory for the install and deploy commands
    #[arg(short = 'C', long, global = true)]
    pub project_dir: Option<PathBuf>,

    /// Show what would run without executing anything
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Install the hosting CLI if needed and run a production deploy (default)
    Deploy,
    /// Print the configuration secrets the backend expects
    Secrets,
    /// Report which secret names are set in the local environment
    Env,
    /// Check a deployed backend's root, health and auth endpoints
    Verify {
        /// Base URL of the deployment (overrides verify.url)
        #[arg(long)]
        url: Option<String>,
    },
}

impl CliConfig {
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Deploy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_means_deploy() {
        let cli = CliConfig::try_parse_from(["libsys-deploy"]).unwrap();
        assert!(matches!(cli.command(), Command::Deploy));
        assert!(!cli.dry_run);
        assert!(cli.config.is_none());
    }

    #[test]
    fn verify_takes_a_url() {
        let cli =
            CliConfig::try_parse_from(["libsys-deploy", "verify", "--url", "https://x.dev"])
                .unwrap();
        match cli.command() {
            Command::Verify { url } => assert_eq!(url.as_deref(), Some("https://x.dev")),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = CliConfig::try_parse_from(["libsys-deploy", "deploy", "--dry-run", "-v"])
            .unwrap();
        assert!(cli.dry_run);
        assert!(cli.verbose);
    }

    #[test]
    fn rejects_positional_arguments() {
        assert!(CliConfig::try_parse_from(["libsys-deploy", "--prod"]).is_err());
    }
}
