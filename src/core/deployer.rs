use crate::core::secrets;
use crate::domain::model::{DeployReport, Invocation, StepOutcome};
use crate::domain::ports::{ConfigProvider, ProcessRunner};
use crate::utils::error::Result;
use chrono::Utc;
use std::io::Write;

/// The invocations a run would make, computed without executing anything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployPlan {
    pub tool_found: bool,
    pub install: Option<Invocation>,
    pub deploy: Invocation,
}

pub struct DeployEngine<R: ProcessRunner, C: ConfigProvider> {
    runner: R,
    config: C,
}

impl<R: ProcessRunner, C: ConfigProvider> DeployEngine<R, C> {
    pub fn new(runner: R, config: C) -> Self {
        Self { runner, config }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// `<program> --prod [extra args]`
    pub fn deploy_invocation(&self) -> Invocation {
        let tool = self.config.tool();
        let args = std::iter::once(self.config.mode().flag().to_string())
            .chain(self.config.extra_args().iter().cloned());
        Invocation::new(tool.program.clone(), args)
    }

    pub fn plan(&self) -> DeployPlan {
        let tool = self.config.tool();
        let tool_found = self.runner.locate(&tool.program).is_some();
        DeployPlan {
            tool_found,
            install: (!tool_found).then(|| tool.install.clone()),
            deploy: self.deploy_invocation(),
        }
    }

    pub fn dry_run<W: Write>(&self, out: &mut W) -> Result<DeployPlan> {
        let plan = self.plan();
        writeln!(out, "🔍 Dry run, nothing will be executed")?;
        if let Some(dir) = self.config.project_dir() {
            writeln!(out, "Working directory: {}", dir.display())?;
        }
        match &plan.install {
            Some(install) => writeln!(out, "Would install: {}", install)?,
            None => writeln!(out, "{} is already installed", self.config.tool().program)?,
        }
        writeln!(out, "Would run: {}", plan.deploy)?;
        secrets::write_reminders(out, self.config.secrets(), self.config.dashboard_hint())?;
        Ok(plan)
    }

    /// Ensure the CLI, deploy, then print the reminders whatever the deploy outcome was.
    pub async fn run<W: Write>(&self, out: &mut W) -> Result<DeployReport> {
        let started_at = Utc::now();
        let tool = self.config.tool();
        let working_dir = self.config.project_dir();

        writeln!(out, "🚀 Deploying backend to {}...", self.config.mode())?;

        let tool_found = match self.runner.locate(&tool.program) {
            Some(path) => {
                tracing::debug!("Found {} at {}", tool.program, path.display());
                true
            }
            None => false,
        };

        let install = if tool_found {
            None
        } else {
            writeln!(out, "📦 {} not found, installing: {}", tool.program, tool.install)?;
            out.flush()?;
            let outcome = self.runner.run(&tool.install, working_dir).await;
            if !outcome.is_success() {
                // 安裝失敗仍繼續部署
                tracing::warn!("Install of {} {}", tool.program, outcome);
            }
            Some(outcome)
        };

        let deploy_invocation = self.deploy_invocation();
        tracing::info!("Running {}", deploy_invocation);
        out.flush()?;
        let deploy = self.runner.run(&deploy_invocation, working_dir).await;

        if !deploy.is_success() {
            tracing::error!("Deploy {}", deploy);
        }

        // 部署已結束：輸出失敗不可蓋掉部署結果
        let reminders = match self.write_summary(out, &deploy) {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!("Could not write deploy summary: {}", e);
                secrets::reminder_lines(self.config.secrets())
            }
        };

        Ok(DeployReport {
            tool_found,
            install,
            deploy,
            reminders,
            started_at,
            finished_at: Utc::now(),
        })
    }

    fn write_summary<W: Write>(
        &self,
        out: &mut W,
        deploy: &StepOutcome,
    ) -> std::io::Result<Vec<String>> {
        match deploy {
            StepOutcome::Succeeded => writeln!(out, "✅ Deployment complete!")?,
            other => writeln!(out, "❌ Deployment {}", other)?,
        }
        let lines =
            secrets::write_reminders(out, self.config.secrets(), self.config.dashboard_hint())?;
        out.flush()?;
        Ok(lines)
    }
}
