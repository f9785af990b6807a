use crate::adapters::SystemRunner;
use crate::config::cli::{CliConfig, Command};
use crate::config::DeployConfig;
use crate::core::deployer::DeployEngine;
use crate::core::{secrets, verify};
use crate::utils::error::Result;
use crate::utils::validation::{validate_required_field, validate_url};
use std::io::Write;
use std::path::Path;

/// Loads the config relative to `cwd` and applies command-line overrides.
pub fn resolve_config(args: &CliConfig, cwd: &Path) -> Result<DeployConfig> {
    let mut config = DeployConfig::load(args.config.as_deref(), cwd)?;
    // 命令列參數優先於設定檔
    if let Some(dir) = &args.project_dir {
        config.project_dir = Some(dir.clone());
    }
    Ok(config)
}

/// Runs the selected command and returns the process exit code.
pub async fn dispatch<W: Write>(args: &CliConfig, cwd: &Path, out: &mut W) -> Result<i32> {
    let config = resolve_config(args, cwd)?;

    match args.command() {
        Command::Deploy => {
            if let Some(dir) = &config.project_dir {
                tracing::info!("Project directory: {}", dir.display());
            }
            let engine = DeployEngine::new(SystemRunner::new(), config);
            if args.dry_run {
                engine.dry_run(out)?;
                return Ok(0);
            }
            let report = engine.run(out).await?;
            tracing::debug!(
                "Deploy finished in {}ms",
                report.elapsed().num_milliseconds()
            );
            if args.log_json {
                tracing::info!(report = %serde_json::to_string(&report)?, "deploy report");
            }
            Ok(report.exit_code())
        }
        Command::Secrets => {
            secrets::write_catalogue(out, &config.secrets)?;
            writeln!(out, "Set them in: {}", config.dashboard_hint)?;
            Ok(0)
        }
        Command::Env => {
            let presence = secrets::check_presence(&config.secrets, secrets::env_is_set);
            secrets::write_presence(out, &presence)?;
            Ok(if secrets::missing_required(&presence).is_empty() {
                0
            } else {
                1
            })
        }
        Command::Verify { url } => {
            let url = url.or_else(|| config.resolved_verify_url().map(str::to_string));
            let url = validate_required_field("verify.url", &url)?;
            validate_url("verify.url", url)?;
            if args.dry_run {
                writeln!(out, "Would check: {} (root, /health and auth routes)", url)?;
                return Ok(0);
            }
            let report = verify::verify_deployment(url, config.verify_timeout).await?;
            verify::write_health(out, &report)?;
            Ok(if report.is_healthy() { 0 } else { 1 })
        }
    }
}
