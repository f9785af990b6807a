use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The hosting CLI and how to install it when it is missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolSpec {
    pub program: String,
    pub install: Invocation,
}

impl Default for ToolSpec {
    fn default() -> Self {
        Self {
            program: "vercel".to_string(),
            install: Invocation::new("npm", ["install", "-g", "vercel"]),
        }
    }
}

/// Deploy mode. Production is the only mode the tool ever selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeployMode {
    #[default]
    Production,
}

impl DeployMode {
    pub fn flag(self) -> &'static str {
        match self {
            DeployMode::Production => "--prod",
        }
    }
}

impl fmt::Display for DeployMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployMode::Production => write!(f, "production"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// What the tool observed about an external process. Nothing beyond the exit status is inspected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome {
    Succeeded,
    Failed { code: Option<i32> },
    NotStarted { reason: String },
}

impl StepOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StepOutcome::Succeeded)
    }

    /// Exit code to hand back to the shell for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            StepOutcome::Succeeded => 0,
            StepOutcome::Failed { code: Some(code) } if *code != 0 => *code,
            StepOutcome::Failed { .. } | StepOutcome::NotStarted { .. } => 1,
        }
    }
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Succeeded => write!(f, "succeeded"),
            StepOutcome::Failed { code: Some(code) } => write!(f, "failed (exit code {})", code),
            StepOutcome::Failed { code: None } => write!(f, "failed (terminated by signal)"),
            StepOutcome::NotStarted { reason } => write!(f, "could not start: {}", reason),
        }
    }
}

/// A configuration secret the deployed backend reads at runtime. Only the name is ever handled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRequirement {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl SecretRequirement {
    pub fn required(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            required: true,
        }
    }

    pub fn optional(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            required: false,
        }
    }
}

/// Secrets the Library Management System API validates at startup, plus the optional CORS origin.
pub fn default_secrets() -> Vec<SecretRequirement> {
    vec![
        SecretRequirement::required("SUPABASE_URL", "Supabase project URL"),
        SecretRequirement::required(
            "SUPABASE_SERVICE_ROLE_KEY",
            "Supabase service role key (privileged)",
        ),
        SecretRequirement::required("SUPABASE_ANON_KEY", "Supabase anonymous public key"),
        SecretRequirement::required("SUPABASE_JWT_SECRET", "Supabase JWT signing secret"),
        SecretRequirement::optional("FRONTEND_URL", "Frontend origin allowed by CORS"),
    ]
}

#[derive(Debug, Clone, Serialize)]
pub struct DeployReport {
    pub tool_found: bool,
    pub install: Option<StepOutcome>,
    pub deploy: StepOutcome,
    pub reminders: Vec<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl DeployReport {
    pub fn exit_code(&self) -> i32 {
        self.deploy.exit_code()
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

/// Presence of one secret name in the local environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretPresence {
    pub name: String,
    pub required: bool,
    pub present: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthPayload {
    pub status: String,
    #[serde(default)]
    pub supabase_configured: Option<bool>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Auth-guarded routes that must reject a request without a bearer token.
pub const GUARDED_ROUTES: [&str; 3] = [
    "api/auth/me",
    "api/auth/profile",
    "api/auth/validate-token",
];

/// Answer of one guarded route to a request carrying no token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthGuardCheck {
    pub route: String,
    pub status: u16,
}

impl AuthGuardCheck {
    pub fn is_guarded(&self) -> bool {
        self.status == 401
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthReport {
    pub base_url: String,
    pub root_message: String,
    pub status: String,
    pub supabase_configured: Option<bool>,
    pub auth_guards: Vec<AuthGuardCheck>,
}

impl HealthReport {
    /// `/health` says healthy and every guarded route answers 401.
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy" && self.auth_guards.iter().all(AuthGuardCheck::is_guarded)
    }
}
