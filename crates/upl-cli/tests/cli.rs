//! End-to-end tests spawning the upl binary against a temp catalog.

use std::path::PathBuf;
use std::process::Command;
use tempfile::TempDir;

const CATALOG: &str = r#"
repositories = ["core", "extra"]
categories = ["Featured", "Development", "Music"]

[[native]]
name = "bash"
version = "5.2"
description = "The GNU Bourne Again shell"
repository = "core"
installed = true

[[native]]
name = "htop"
version = "3.3.0"
description = "Interactive process viewer"
repository = "extra"
depends = ["ncurses"]
download_size = 1048576

[[snap]]
name = "code"
version = "1.92"
app_name = "Visual Studio Code"
description = "Code editing. Redefined."
channel = "stable"
publisher = "vscode"
confined = "classic"
categories = ["Development", "Featured"]

[[snap]]
name = "featured-only"
version = "1.0"
categories = ["Featured"]

[[flatpak]]
name = "org.gimp.GIMP"
app_name = "GIMP"
version = "2.10"
description = "GNU Image Manipulation Program"
categories = ["Development"]
"#;

/// Test context with a temporary catalog file.
struct TestContext {
    _temp_dir: TempDir,
    catalog: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let catalog = temp_dir.path().join("catalog.toml");
        std::fs::write(&catalog, CATALOG).expect("failed to write catalog");
        Self {
            _temp_dir: temp_dir,
            catalog,
        }
    }

    fn upl_cmd(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_upl"));
        cmd.arg("--catalog").arg(&self.catalog);
        cmd.env_remove("UPL_CATALOG");
        cmd
    }
}

#[test]
fn test_help_command() {
    let output = Command::new(env!("CARGO_BIN_EXE_upl"))
        .arg("--help")
        .output()
        .expect("failed to run upl");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
}

#[test]
fn test_search_spans_backends() {
    let ctx = TestContext::new();
    let output = ctx
        .upl_cmd()
        .args(["search", "code"])
        .output()
        .expect("failed to run upl search");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("code"));
    assert!(stdout.contains("SEARCH COMPLETE"));
}

#[test]
fn test_search_backend_filter() {
    let ctx = TestContext::new();
    let output = ctx
        .upl_cmd()
        .args(["search", "o", "--backend", "snap"])
        .output()
        .expect("failed to run upl search");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Visual Studio Code") || stdout.contains("code"));
    assert!(!stdout.contains("htop"));
}

#[test]
fn test_search_no_results() {
    let ctx = TestContext::new();
    let output = ctx
        .upl_cmd()
        .args(["search", "no-such-thing"])
        .output()
        .expect("failed to run upl search");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("No packages found"));
}

#[test]
fn test_info_shows_native_detail() {
    let ctx = TestContext::new();
    let output = ctx
        .upl_cmd()
        .args(["info", "htop"])
        .output()
        .expect("failed to run upl info");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Interactive process viewer"));
    assert!(stdout.contains("ncurses"));
    // Sizes render human-readable by default.
    assert!(stdout.contains("1.0 MB"));
}

#[test]
fn test_info_raw_sizes() {
    let ctx = TestContext::new();
    let output = ctx
        .upl_cmd()
        .args(["info", "htop", "--raw-sizes"])
        .output()
        .expect("failed to run upl info");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1048576"));
}

#[test]
fn test_info_json_is_parseable() {
    let ctx = TestContext::new();
    let output = ctx
        .upl_cmd()
        .args(["info", "code", "--backend", "snap", "--json"])
        .output()
        .expect("failed to run upl info");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let value: serde_json::Value = serde_json::from_str(&stdout).expect("invalid JSON");
    assert_eq!(value["name"], "code");
    assert_eq!(value["channel"], "stable");
}

#[test]
fn test_info_unknown_package_fails() {
    let ctx = TestContext::new();
    let output = ctx
        .upl_cmd()
        .args(["info", "missing"])
        .output()
        .expect("failed to run upl info");
    assert!(!output.status.success());
}

#[test]
fn test_available_skips_featured_only_snaps() {
    let ctx = TestContext::new();
    let output = ctx
        .upl_cmd()
        .args(["available", "--backend", "snap"])
        .output()
        .expect("failed to run upl available");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("code"));
    assert!(!stdout.contains("featured-only"));
}

#[test]
fn test_list_shows_installed() {
    let ctx = TestContext::new();
    let output = ctx
        .upl_cmd()
        .arg("list")
        .output()
        .expect("failed to run upl list");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("bash"));
    assert!(!stdout.contains("htop"));
}

#[test]
fn test_sources_lists_repos_and_categories() {
    let ctx = TestContext::new();
    let output = ctx
        .upl_cmd()
        .arg("sources")
        .output()
        .expect("failed to run upl sources");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("extra"));
    assert!(stdout.contains("Development"));
}

#[test]
fn test_dry_run_install_succeeds() {
    let ctx = TestContext::new();
    let output = ctx
        .upl_cmd()
        .args(["--dry-run", "install", "htop"])
        .output()
        .expect("failed to run upl install");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("TRANSACTION COMPLETE"));
}

#[test]
fn test_install_unknown_native_is_sanitized_away() {
    let ctx = TestContext::new();
    let output = ctx
        .upl_cmd()
        .args(["install", "no-such-pkg"])
        .output()
        .expect("failed to run upl install");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Nothing to do."));
}

#[test]
fn test_install_already_installed_is_nothing_to_do() {
    let ctx = TestContext::new();
    let output = ctx
        .upl_cmd()
        .args(["install", "bash"])
        .output()
        .expect("failed to run upl install");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Nothing to do."));
}

#[test]
fn test_install_unknown_snap_fails() {
    let ctx = TestContext::new();
    let output = ctx
        .upl_cmd()
        .args(["install", "no-such-snap", "--backend", "snap"])
        .output()
        .expect("failed to run upl install");
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("TRANSACTION FAILED"));
}

#[test]
fn test_remove_not_installed_warns_but_succeeds() {
    let ctx = TestContext::new();
    let output = ctx
        .upl_cmd()
        .args(["remove", "htop"])
        .output()
        .expect("failed to run upl remove");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("WARNING"));
    assert!(stdout.contains("TRANSACTION COMPLETE"));
}

#[test]
fn test_missing_catalog_is_a_clear_error() {
    let output = Command::new(env!("CARGO_BIN_EXE_upl"))
        .env_remove("UPL_CATALOG")
        .args(["search", "htop"])
        .output()
        .expect("failed to run upl");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("catalog"));
}

#[test]
fn test_catalog_from_env() {
    let ctx = TestContext::new();
    let output = Command::new(env!("CARGO_BIN_EXE_upl"))
        .env("UPL_CATALOG", &ctx.catalog)
        .args(["search", "htop"])
        .output()
        .expect("failed to run upl");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("htop"));
}
