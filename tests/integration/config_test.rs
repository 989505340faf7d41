//! Settings loaded from files, environment and flags, then used for a run

use std::fs;
use std::path::PathBuf;

use super::support::{unused, Project};
use orphans::config::{load_config_with_env_prefix, CliArgs, DEFAULT_CONFIG_FILE};
use orphans::{OrphanError, ReachabilityPolicy};

fn aliased_project() -> Project {
    Project::new(&[
        ("app/main.ts", "import { helper } from '~shared/helper';\n"),
        ("app/shared/helper.ts", "export const helper = 1;\n"),
        ("app/shared/helper.spec.ts", "import './helper';\n"),
        ("app/stray.ts", ""),
    ])
}

fn write_config(project: &Project, body: &str) -> PathBuf {
    let path = project.path(DEFAULT_CONFIG_FILE);
    let root = format!("root = {:?}\n", project.root().display().to_string());
    fs::write(&path, format!("{}{}", root, body)).unwrap();
    path
}

#[test]
fn test_config_file_drives_the_run() {
    let project = aliased_project();
    let config = write_config(
        &project,
        r#"
include = ["app/**/*.ts"]
exclude = ["app/**/*.spec.ts"]
entries = ["app/main.ts"]
policy = "entry-rooted"
show_progress = false

[[alias]]
find = "~shared"
replacement = "app/shared"
"#,
    );

    let cli_args = CliArgs {
        config: Some(config),
        ..Default::default()
    };
    let settings = load_config_with_env_prefix(cli_args, "ORPHANS_IT_CONFIG_FILE").unwrap();
    assert_eq!(settings.policy, ReachabilityPolicy::EntryRooted);

    let report = project.analyze(settings);
    assert_eq!(report.summary.inventory_files, 3);
    assert_eq!(unused(&report), vec!["app/stray.ts"]);
    assert!(report.unresolved.is_empty());
}

#[test]
fn test_flags_override_the_file() {
    let project = aliased_project();
    let config = write_config(
        &project,
        "include = [\"app/**/*.ts\"]\npolicy = \"entry-rooted\"\nshow_progress = false\n",
    );

    let cli_args = CliArgs {
        config: Some(config),
        policy: Some(ReachabilityPolicy::EdgeTarget),
        exclude: vec!["app/**/*.spec.ts".to_string()],
        alias: vec!["~shared=app/shared".parse().unwrap()],
        entries: vec![PathBuf::from("app/main.ts")],
        ..Default::default()
    };
    let settings = load_config_with_env_prefix(cli_args, "ORPHANS_IT_FLAGS").unwrap();
    assert_eq!(settings.policy, ReachabilityPolicy::EdgeTarget);

    let report = project.analyze(settings);
    assert_eq!(unused(&report), vec!["app/stray.ts"]);
}

#[test]
fn test_environment_sits_between_file_and_flags() {
    let project = aliased_project();
    let config = write_config(&project, "include = [\"app/**/*.ts\"]\n");
    let prefix = "ORPHANS_IT_ENV";
    std::env::set_var(format!("{}_POLICY", prefix), "entry-rooted");
    std::env::set_var(format!("{}_ENTRIES", prefix), "app/main.ts");

    let cli_args = CliArgs {
        config: Some(config.clone()),
        ..Default::default()
    };
    let settings = load_config_with_env_prefix(cli_args, prefix).unwrap();
    assert_eq!(settings.policy, ReachabilityPolicy::EntryRooted);
    assert_eq!(settings.entries, vec![PathBuf::from("app/main.ts")]);

    let cli_args = CliArgs {
        config: Some(config),
        policy: Some(ReachabilityPolicy::EdgeTarget),
        ..Default::default()
    };
    let settings = load_config_with_env_prefix(cli_args, prefix).unwrap();
    assert_eq!(settings.policy, ReachabilityPolicy::EdgeTarget);
}

#[test]
fn test_invalid_configuration_is_critical() {
    let project = aliased_project();

    let config = write_config(&project, "include = [\"app/[*\"]\n");
    let err = load_config_with_env_prefix(
        CliArgs {
            config: Some(config),
            ..Default::default()
        },
        "ORPHANS_IT_INVALID",
    )
    .unwrap_err();
    assert!(err.is_critical());

    let config = write_config(&project, "threads = 0\n");
    let err = load_config_with_env_prefix(
        CliArgs {
            config: Some(config),
            ..Default::default()
        },
        "ORPHANS_IT_INVALID",
    )
    .unwrap_err();
    assert!(matches!(err, OrphanError::Config { .. }));

    let err = load_config_with_env_prefix(
        CliArgs {
            config: Some(project.path("missing.toml")),
            ..Default::default()
        },
        "ORPHANS_IT_INVALID",
    )
    .unwrap_err();
    assert!(matches!(err, OrphanError::ConfigNotFound { .. }));
}
