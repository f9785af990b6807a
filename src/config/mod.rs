#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::model::{default_secrets, Invocation, SecretRequirement, ToolSpec};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{DeployError, Result};
use crate::utils::validation::{self, Validate};
use std::path::{Path, PathBuf};
use std::time::Duration;
use self::toml_config::{has_unresolved_placeholder, DeployToml};

pub const DEFAULT_CONFIG_FILE: &str = "deploy.toml";
pub const DEFAULT_DASHBOARD_HINT: &str =
    "Vercel dashboard > your project > Settings > Environment Variables";
pub const DEFAULT_VERIFY_TIMEOUT_SECS: u64 = 10;

/// Flags that would select a deploy mode. The production flag is fixed, so none may appear in extra args.
const MODE_FLAGS: &[&str] = &["--prod", "--target", "--environment"];

/// Fully resolved settings for one run.
#[derive(Debug, Clone)]
pub struct DeployConfig {
    pub tool: ToolSpec,
    pub extra_args: Vec<String>,
    pub secrets: Vec<SecretRequirement>,
    pub dashboard_hint: String,
    pub project_dir: Option<PathBuf>,
    pub verify_url: Option<String>,
    pub verify_timeout: Duration,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            tool: ToolSpec::default(),
            extra_args: Vec::new(),
            secrets: default_secrets(),
            dashboard_hint: DEFAULT_DASHBOARD_HINT.to_string(),
            project_dir: None,
            verify_url: None,
            verify_timeout: Duration::from_secs(DEFAULT_VERIFY_TIMEOUT_SECS),
        }
    }
}

impl DeployConfig {
    /// Loads `path` when given, otherwise `deploy.toml` in `base_dir` if it exists, otherwise defaults.
    pub fn load(path: Option<&Path>, base_dir: &Path) -> Result<Self> {
        match path {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path.display());
                Self::from_toml(DeployToml::from_file(path)?)
            }
            None => {
                let candidate = base_dir.join(DEFAULT_CONFIG_FILE);
                if candidate.is_file() {
                    tracing::debug!("Loading configuration from {}", candidate.display());
                    Self::from_toml(DeployToml::from_file(candidate)?)
                } else {
                    tracing::debug!("No {} found, using built-in defaults", DEFAULT_CONFIG_FILE);
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_toml(file: DeployToml) -> Result<Self> {
        let mut config = Self::default();

        if let Some(tool) = file.tool {
            if let Some(program) = tool.program {
                config.tool.program = program;
            }
            if let Some(install) = tool.install {
                let mut parts = install.into_iter();
                let program = parts.next().ok_or_else(|| DeployError::ConfigValidationError {
                    field: "tool.install".to_string(),
                    message: "Install command cannot be empty".to_string(),
                })?;
                config.tool.install = Invocation::new(program, parts);
            }
        }

        if let Some(deploy) = file.deploy {
            if let Some(extra_args) = deploy.extra_args {
                config.extra_args = extra_args;
            }
            config.project_dir = deploy.project_dir.map(PathBuf::from);
        }

        if let Some(hint) = file.dashboard.and_then(|d| d.hint) {
            config.dashboard_hint = hint;
        }

        if let Some(secrets) = file.secrets {
            config.secrets = secrets;
        }

        if let Some(verify) = file.verify {
            config.verify_url = verify.url;
            if let Some(secs) = verify.timeout_seconds {
                validation::validate_range("verify.timeout_seconds", secs, 1, 300)?;
                config.verify_timeout = Duration::from_secs(secs);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// The verify URL, unless it is missing or still an unfilled `${VAR}` placeholder.
    pub fn resolved_verify_url(&self) -> Option<&str> {
        self.verify_url
            .as_deref()
            .filter(|url| !has_unresolved_placeholder(url))
    }
}

impl Validate for DeployConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("tool.program", &self.tool.program)?;
        validation::validate_non_empty_string("tool.install", &self.tool.install.program)?;

        for arg in &self.extra_args {
            let flag = arg.split('=').next().unwrap_or(arg);
            if MODE_FLAGS.contains(&flag) {
                return Err(DeployError::InvalidConfigValueError {
                    field: "deploy.extra_args".to_string(),
                    value: arg.clone(),
                    reason: "Deploys always target production; mode flags are not allowed"
                        .to_string(),
                });
            }
        }

        if let Some(dir) = &self.project_dir {
            validation::validate_path("deploy.project_dir", &dir.to_string_lossy())?;
        }

        for secret in &self.secrets {
            validation::validate_env_name("secrets.name", &secret.name)?;
        }
        validation::validate_unique_names("secrets", self.secrets.iter().map(|s| s.name.as_str()))?;

        if let Some(url) = self.resolved_verify_url() {
            validation::validate_url("verify.url", url)?;
        }

        Ok(())
    }
}

impl ConfigProvider for DeployConfig {
    fn tool(&self) -> &ToolSpec {
        &self.tool
    }

    fn extra_args(&self) -> &[String] {
        &self.extra_args
    }

    fn secrets(&self) -> &[SecretRequirement] {
        &self.secrets
    }

    fn dashboard_hint(&self) -> &str {
        &self.dashboard_hint
    }

    fn project_dir(&self) -> Option<&Path> {
        self.project_dir.as_deref()
    }
}
