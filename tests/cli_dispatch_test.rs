#![cfg(feature = "cli")]

use clap::Parser;
use httpmock::prelude::*;
use libsys_deploy::app::{dispatch, resolve_config};
use libsys_deploy::{CliConfig, DeployError};
use std::path::Path;
use tempfile::TempDir;

fn workspace(config: &str) -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("deploy.toml"), config).unwrap();
    dir
}

fn parse(args: &[&str]) -> CliConfig {
    CliConfig::try_parse_from(std::iter::once("libsys-deploy").chain(args.iter().copied()))
        .unwrap()
}

async fn run(args: &[&str], cwd: &Path) -> (Result<i32, DeployError>, String) {
    let mut out = Vec::new();
    let result = dispatch(&parse(args), cwd, &mut out).await;
    (result, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn test_env_exits_zero_when_required_names_are_set() {
    let dir = workspace(
        r#"
[[secrets]]
name = "LIBSYS_DISPATCH_SET_KEY"

[[secrets]]
name = "LIBSYS_DISPATCH_OPTIONAL_KEY"
required = false
"#,
    );
    std::env::set_var("LIBSYS_DISPATCH_SET_KEY", "dispatch-secret-value");

    let (result, text) = run(&["env"], dir.path()).await;

    assert_eq!(result.unwrap(), 0);
    assert!(text.contains("LIBSYS_DISPATCH_SET_KEY"));
    assert!(!text.contains("dispatch-secret-value"));
    std::env::remove_var("LIBSYS_DISPATCH_SET_KEY");
}

#[tokio::test]
async fn test_env_exits_one_when_a_required_name_is_missing() {
    let dir = workspace("[[secrets]]\nname = \"LIBSYS_DISPATCH_NEVER_SET_KEY\"\n");

    let (result, text) = run(&["env"], dir.path()).await;

    assert_eq!(result.unwrap(), 1);
    assert!(text.contains("LIBSYS_DISPATCH_NEVER_SET_KEY"));
}

#[tokio::test]
async fn test_verify_without_url_is_missing_config() {
    let dir = TempDir::new().unwrap();

    let (result, _) = run(&["verify"], dir.path()).await;

    let err = result.unwrap_err();
    assert!(matches!(err, DeployError::MissingConfigError { ref field } if field == "verify.url"));
    assert_eq!(err.severity().exit_code(), 1);
}

#[tokio::test]
async fn test_verify_with_unresolved_placeholder_is_missing_config() {
    let dir = workspace("[verify]\nurl = \"${LIBSYS_DISPATCH_UNSET_URL}\"\n");

    let (result, _) = run(&["verify"], dir.path()).await;

    let err = result.unwrap_err();
    assert!(matches!(err, DeployError::MissingConfigError { .. }));
    assert_eq!(err.severity().exit_code(), 1);
}

#[tokio::test]
async fn test_verify_open_auth_route_exits_one() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200)
            .json_body(serde_json::json!({"message": "Library Management System API"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(200)
            .json_body(serde_json::json!({"status": "healthy", "supabase_configured": true}));
    });
    server.mock(|when, then| {
        when.method(GET).path_contains("/api/auth/");
        then.status(200).json_body(serde_json::json!({"id": "anonymous"}));
    });
    let dir = TempDir::new().unwrap();

    let (result, text) = run(&["verify", "--url", &server.base_url()], dir.path()).await;

    assert_eq!(result.unwrap(), 1);
    assert!(text.contains("should require authentication"));
}

#[tokio::test]
async fn test_verify_reads_url_from_config() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200)
            .json_body(serde_json::json!({"message": "Library Management System API"}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/health");
        then.status(200).json_body(serde_json::json!({"status": "healthy"}));
    });
    server.mock(|when, then| {
        when.method(GET).path_contains("/api/auth/");
        then.status(401)
            .json_body(serde_json::json!({"detail": "Not authenticated"}));
    });
    let dir = workspace(&format!("[verify]\nurl = \"{}\"\n", server.base_url()));

    let (result, _) = run(&["verify"], dir.path()).await;

    assert_eq!(result.unwrap(), 0);
}

#[tokio::test]
async fn test_project_dir_flag_overrides_config() {
    let dir = workspace("[deploy]\nproject_dir = \"from-config\"\n");

    let from_file = resolve_config(&parse(&[]), dir.path()).unwrap();
    assert_eq!(from_file.project_dir.as_deref(), Some(Path::new("from-config")));

    let args = parse(&["-C", "/srv/override", "--dry-run"]);
    let config = resolve_config(&args, dir.path()).unwrap();
    assert_eq!(config.project_dir.as_deref(), Some(Path::new("/srv/override")));

    let (result, text) = run(&["-C", "/srv/override", "--dry-run"], dir.path()).await;
    assert_eq!(result.unwrap(), 0);
    assert!(text.contains("Working directory: /srv/override"));
    assert!(!text.contains("from-config"));
}

#[tokio::test]
async fn test_secrets_lists_configured_names() {
    let dir = workspace(
        r#"
[dashboard]
hint = "Netlify > Site settings > Environment variables"

[[secrets]]
name = "LIBSYS_DISPATCH_LISTED_KEY"
description = "Listed in the catalogue"
"#,
    );
    let config_path = dir.path().join("deploy.toml");
    let other_cwd = TempDir::new().unwrap();

    let (result, text) = run(
        &["-c", config_path.to_str().unwrap(), "secrets"],
        other_cwd.path(),
    )
    .await;

    assert_eq!(result.unwrap(), 0);
    assert!(text.contains("LIBSYS_DISPATCH_LISTED_KEY"));
    assert!(text.contains("Set them in: Netlify > Site settings > Environment variables"));
}
