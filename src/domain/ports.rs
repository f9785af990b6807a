use crate::domain::model::{DeployMode, Invocation, SecretRequirement, StepOutcome, ToolSpec};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// Runs external programs. The real implementation inherits stdio so tool output surfaces verbatim.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Look the program up on the search path.
    fn locate(&self, program: &str) -> Option<PathBuf>;

    /// Run to completion. Spawn failures are reported as `StepOutcome::NotStarted`, never as `Err`.
    async fn run(&self, invocation: &Invocation, working_dir: Option<&Path>) -> StepOutcome;
}

pub trait ConfigProvider: Send + Sync {
    fn tool(&self) -> &ToolSpec;
    fn mode(&self) -> DeployMode {
        DeployMode::Production
    }
    fn extra_args(&self) -> &[String];
    fn secrets(&self) -> &[SecretRequirement];
    fn dashboard_hint(&self) -> &str;
    fn project_dir(&self) -> Option<&Path>;
}
