use crate::domain::model::{Invocation, StepOutcome};
use crate::domain::ports::ProcessRunner;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// Runs real processes with inherited stdio, so the hosting CLI talks to the terminal directly.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    search_path: Option<OsString>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `path` instead of the process `PATH` for lookups and for spawned children.
    pub fn with_search_path(path: impl Into<OsString>) -> Self {
        Self {
            search_path: Some(path.into()),
        }
    }

    fn search_path(&self) -> Option<OsString> {
        self.search_path
            .clone()
            .or_else(|| std::env::var_os("PATH"))
    }
}

#[async_trait]
impl ProcessRunner for SystemRunner {
    fn locate(&self, program: &str) -> Option<PathBuf> {
        let candidate = Path::new(program);
        if candidate.components().count() > 1 {
            return is_executable(candidate).then(|| candidate.to_path_buf());
        }

        let search_path = self.search_path()?;
        std::env::split_paths(&search_path)
            .filter(|dir| !dir.as_os_str().is_empty())
            .flat_map(|dir| executable_names(program).map(move |name| dir.join(name)))
            .find(|path| is_executable(path))
    }

    async fn run(&self, invocation: &Invocation, working_dir: Option<&Path>) -> StepOutcome {
        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        if let Some(path) = &self.search_path {
            cmd.env("PATH", path);
        }
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        tracing::debug!("Spawning `{}`", invocation);
        match cmd.status().await {
            Ok(status) if status.success() => StepOutcome::Succeeded,
            Ok(status) => StepOutcome::Failed {
                code: status.code(),
            },
            Err(e) => StepOutcome::NotStarted {
                reason: e.to_string(),
            },
        }
    }
}

#[cfg(windows)]
fn executable_names(program: &str) -> impl Iterator<Item = String> + '_ {
    let exts = std::env::var("PATHEXT").unwrap_or_else(|_| ".COM;.EXE;.BAT;.CMD".to_string());
    let with_ext: Vec<String> = exts
        .split(';')
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!("{}{}", program, ext.to_ascii_lowercase()))
        .collect();
    std::iter::once(program.to_string()).chain(with_ext)
}

#[cfg(not(windows))]
fn executable_names(program: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(program.to_string())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn locate_misses_on_empty_search_path() {
        let dir = TempDir::new().unwrap();
        let runner = SystemRunner::with_search_path(dir.path());
        assert!(runner.locate("vercel").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn locate_finds_executables_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let plain = dir.path().join("vercel");
        std::fs::write(&plain, "#!/bin/sh\n").unwrap();

        let runner = SystemRunner::with_search_path(dir.path());
        assert!(runner.locate("vercel").is_none());

        std::fs::set_permissions(&plain, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(runner.locate("vercel"), Some(plain));
    }

    #[tokio::test]
    async fn run_reports_spawn_failure() {
        let dir = TempDir::new().unwrap();
        let runner = SystemRunner::with_search_path(dir.path());
        let outcome = runner
            .run(&Invocation::new("definitely-not-a-real-cli-xyz", ["--prod"]), None)
            .await;
        assert!(matches!(outcome, StepOutcome::NotStarted { .. }));
    }
}
