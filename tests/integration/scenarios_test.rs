//! End-to-end analysis of small projects

use std::path::PathBuf;

use super::support::{unused, Project};
use orphans::ReachabilityPolicy;

fn simple_project() -> Project {
    Project::new(&[
        ("src/main.ts", "import \"./used\";\n"),
        ("src/used.ts", "export const used = 1;\n"),
        ("src/orphan.ts", "export const orphan = 1;\n"),
    ])
}

#[test]
fn test_simple_project_under_both_policies() {
    let project = simple_project();

    let mut settings = project.settings();
    settings.entries = vec![PathBuf::from("src/main.ts")];
    let report = project.analyze(settings.clone());
    assert_eq!(unused(&report), vec!["src/orphan.ts"]);
    assert_eq!(report.summary.inventory_files, 3);

    settings.policy = ReachabilityPolicy::EntryRooted;
    let report = project.analyze(settings);
    assert_eq!(unused(&report), vec!["src/orphan.ts"]);
}

#[test]
fn test_edge_target_without_entries_reports_unreferenced_roots() {
    let project = simple_project();
    let report = project.analyze(project.settings());
    assert_eq!(unused(&report), vec!["src/main.ts", "src/orphan.ts"]);
}

#[test]
fn test_mutual_imports() {
    let project = Project::new(&[("src/a.ts", "import './b';\n"), ("src/b.ts", "import './a';\n")]);

    let report = project.analyze(project.settings());
    assert!(unused(&report).is_empty());
    assert_eq!(report.cycles.len(), 1);

    let mut settings = project.settings();
    settings.policy = ReachabilityPolicy::EntryRooted;
    let report = project.analyze(settings);
    assert_eq!(unused(&report), vec!["src/a.ts", "src/b.ts"]);
}

#[test]
fn test_component_regions() {
    let project = Project::new(&[
        (
            "src/App.vue",
            r#"<template>
  <img src="@/assets/logo.png" alt="logo">
  <Chart />
</template>

<script setup lang="ts">
import Chart from './components/Chart.vue'
</script>

<style lang="scss">
@import "./theme.scss";
</style>
"#,
        ),
        ("src/components/Chart.vue", "<template><div /></template>\n"),
        ("src/assets/logo.png", ""),
        ("src/assets/unused.png", ""),
        ("src/theme.scss", "$brand: red;\n"),
    ]);

    let mut settings = project.settings();
    settings.policy = ReachabilityPolicy::EntryRooted;
    settings.entries = vec![PathBuf::from("src/App.vue")];
    let report = project.analyze(settings);

    assert_eq!(unused(&report), vec!["src/assets/unused.png"]);
    assert!(report.unresolved.is_empty());
}

#[test]
fn test_stylesheet_partials_and_urls() {
    let project = Project::new(&[
        ("src/main.ts", "import './styles/main.scss';\n"),
        (
            "src/styles/main.scss",
            "@use \"variables\";\n// @import \"commented\";\n.hero { background: url(../assets/hero.jpg); }\n",
        ),
        ("src/styles/_variables.scss", "$gap: 4px;\n"),
        ("src/styles/_commented.scss", ""),
        ("src/assets/hero.jpg", ""),
    ]);

    let mut settings = project.settings();
    settings.entries = vec![PathBuf::from("src/main.ts")];
    let report = project.analyze(settings);

    assert_eq!(unused(&report), vec!["src/styles/_commented.scss"]);
}

#[test]
fn test_missing_target_is_reported_not_fatal() {
    let project = Project::new(&[("src/x.ts", "import './missing';\nimport './present';\n"), ("src/present.ts", "")]);

    let report = project.analyze(project.settings());

    assert_eq!(report.unresolved.len(), 1);
    assert_eq!(report.unresolved[0].from, project.path("src/x.ts"));
    assert_eq!(report.unresolved[0].specifier, "./missing");
    assert!(report.warnings.is_empty());
    assert_eq!(unused(&report), vec!["src/x.ts"]);
}

#[test]
fn test_extension_priority_and_aliases() {
    let project = Project::new(&[
        ("src/main.ts", "import Widget from './Widget';\nimport { a } from '@/lib/a';\n"),
        ("src/Widget.tsx", "export default 1;\n"),
        ("src/Widget.ts", "export default 2;\n"),
        ("src/lib/a.ts", "export const a = 1;\n"),
    ]);

    let mut settings = project.settings();
    settings.entries = vec![PathBuf::from("src/main.ts")];

    for _ in 0..3 {
        let report = project.analyze(settings.clone());
        assert_eq!(unused(&report), vec!["src/Widget.ts"]);
    }
}

#[test]
fn test_non_local_specifiers_are_ignored() {
    let project = Project::new(&[(
        "src/main.ts",
        "import 'https://cdn.example.com/x.js';\nimport vue from 'vue';\nconst icon = new URL('data:image/png;base64,AAAA', import.meta.url);\n",
    )]);

    let report = project.analyze(project.settings());
    assert!(report.unresolved.is_empty());
    assert!(report.warnings.is_empty());
    assert_eq!(report.summary.graph.total_edges, 0);
}

#[test]
fn test_root_absolute_links_are_not_stale_references() {
    let project = Project::new(&[
        (
            "src/Nav.tsx",
            r#"import logo from './logo.svg';
export const Nav = () => (
  <nav>
    <link href="/favicon.ico" />
    <a href="/">Home</a>
    <a href="/about">About</a>
    <img src={logo} />
  </nav>
);
"#,
        ),
        ("src/logo.svg", "<svg/>"),
    ]);

    let report = project.analyze(project.settings());
    assert!(report.unresolved.is_empty());
    assert_eq!(report.summary.graph.total_edges, 1);
    assert_eq!(unused(&report), vec!["src/Nav.tsx"]);
}

#[test]
fn test_extensionless_sibling_does_not_hide_module() {
    let project = Project::new(&[
        ("src/main.ts", "import { config } from './config';\n"),
        ("src/config", "legacy\n"),
        ("src/config.ts", "export const config = {};\n"),
    ]);

    let mut settings = project.settings();
    settings.entries = vec![PathBuf::from("src/main.ts")];
    let report = project.analyze(settings);
    // the extensionless file is in the inventory but nothing reaches it
    assert_eq!(unused(&report), vec!["src/config"]);
}

#[test]
fn test_declaration_files_are_excluded_by_default() {
    let project = Project::new(&[("src/main.ts", ""), ("src/env.d.ts", "declare const x: number;\n")]);

    let report = project.analyze(project.settings());
    assert_eq!(report.summary.inventory_files, 1);
    assert_eq!(unused(&report), vec!["src/main.ts"]);
}

#[test]
fn test_unparsable_script_still_yields_references() {
    let project = Project::new(&[
        ("src/broken.ts", "import './dep';\nconst = ;\n"),
        ("src/dep.ts", ""),
    ]);

    let report = project.analyze(project.settings());
    assert_eq!(unused(&report), vec!["src/broken.ts"]);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.warnings[0].path, project.path("src/broken.ts"));
}

#[test]
fn test_repeatable_and_partitioned() {
    let project = Project::new(&[
        ("src/main.ts", "import './a';\nimport('./lazy');\n"),
        ("src/a.ts", "import './b';\nimport './gone';\n"),
        ("src/b.ts", "import './a';\n"),
        ("src/lazy.ts", ""),
        ("src/stray.ts", "import './a';\n"),
    ]);

    let mut settings = project.settings();
    settings.policy = ReachabilityPolicy::EntryRooted;
    settings.entries = vec![PathBuf::from("src/main.ts")];

    let first = project.analyze(settings.clone());
    let second = project.analyze(settings.clone());
    assert_eq!(first.unused, second.unused);
    assert_eq!(first.unresolved, second.unresolved);
    assert_eq!(first.warnings, second.warnings);
    assert_eq!(unused(&first), vec!["src/stray.ts"]);
    assert_eq!(first.summary.used_files + first.summary.unused_files, first.summary.inventory_files);

    settings.parallel = false;
    let sequential = project.analyze(settings);
    assert_eq!(sequential.unused, first.unused);
    assert_eq!(sequential.unresolved, first.unresolved);
}
