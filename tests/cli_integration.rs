//! CLI integration tests for vsave
//!
//! These tests run the binary against real temporary directories, covering
//! the increment, publish and list workflow end to end.

use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Get a command instance for the vsave binary, isolated from user config
fn vsave_cmd(config_dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("vsave"));
    cmd.env("VSAVE_CONFIG_DIR", config_dir.path())
        .env_remove("VSAVE_SUFFIX")
        .env_remove("VSAVE_PUBLISH_SUFFIX")
        .env_remove("VSAVE_EXTENSION")
        .env_remove("VSAVE_LOG");
    cmd
}

/// Project directory plus an empty global config directory
struct Fixture {
    dir: TempDir,
    config: TempDir,
}

impl Fixture {
    fn new(files: &[&str]) -> Self {
        let dir = TempDir::new().unwrap();
        for name in files {
            fs::write(dir.path().join(name), format!("contents of {}", name)).unwrap();
        }
        Self {
            dir,
            config: TempDir::new().unwrap(),
        }
    }

    fn cmd(&self) -> assert_cmd::Command {
        vsave_cmd(&self.config)
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self
            .cmd()
            .args(args)
            .args(["--format", "json"])
            .assert()
            .success();
        let stdout = String::from_utf8_lossy(&output.get_output().stdout);
        serde_json::from_str(&stdout).unwrap()
    }
}

// =============================================================================
// Next / Increment Tests
// =============================================================================

#[test]
fn test_next_prints_next_version() {
    let fx = Fixture::new(&["shot_v001.blend"]);

    fx.cmd()
        .arg("next")
        .arg(fx.path("shot_v001.blend"))
        .assert()
        .success()
        .stdout("shot_v002.blend\n");

    assert!(!fx.path("shot_v002.blend").exists());
}

#[test]
fn test_increment_saves_copy() {
    let fx = Fixture::new(&["shot_v001.blend"]);

    fx.cmd()
        .arg("increment")
        .arg(fx.path("shot_v001.blend"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved"))
        .stdout(predicate::str::contains("shot_v002.blend"));

    let content = fs::read_to_string(fx.path("shot_v002.blend")).unwrap();
    assert_eq!(content, "contents of shot_v001.blend");
}

#[test]
fn test_increment_branches_when_next_exists() {
    let fx = Fixture::new(&["shot_v001.blend", "shot_v002.blend"]);

    let json = fx.json(&["increment", fx.path("shot_v001.blend").to_str().unwrap()]);

    assert_eq!(json["kind"], "branched");
    assert_eq!(json["version"], serde_json::json!([1, 1]));
    assert!(fx.path("shot_v001_001.blend").is_file());
}

#[test]
fn test_increment_unversioned_file() {
    let fx = Fixture::new(&["shot.blend"]);

    fx.cmd()
        .arg("increment")
        .arg(fx.path("shot.blend"))
        .assert()
        .success()
        .stdout(predicate::str::contains("first version"));

    assert!(fx.path("shot_v001.blend").is_file());
}

#[test]
fn test_increment_dry_run_writes_nothing() {
    let fx = Fixture::new(&["shot_v004.blend"]);

    fx.cmd()
        .args(["increment", "--dry-run"])
        .arg(fx.path("shot_v004.blend"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Would save"));

    assert!(!fx.path("shot_v005.blend").exists());
}

#[test]
fn test_increment_refuses_published_file() {
    let fx = Fixture::new(&["shot_published.blend"]);

    fx.cmd()
        .arg("increment")
        .arg(fx.path("shot_published.blend"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("published"));
}

#[test]
fn test_increment_missing_file_fails() {
    let fx = Fixture::new(&[]);

    fx.cmd()
        .arg("increment")
        .arg(fx.path("nope_v001.blend"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_suffix_flag_overrides_default() {
    let fx = Fixture::new(&["shot-r01.blend"]);

    fx.cmd()
        .args(["--suffix", "-r01", "next"])
        .arg(fx.path("shot-r01.blend"))
        .assert()
        .success()
        .stdout("shot-r02.blend\n");
}

#[test]
fn test_invalid_suffix_is_rejected() {
    let fx = Fixture::new(&["shot.blend"]);

    fx.cmd()
        .args(["--suffix", "001", "next"])
        .arg(fx.path("shot.blend"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("non-digit prefix"));
}

// =============================================================================
// Publish Tests
// =============================================================================

#[test]
fn test_publish_copies_to_published_name() {
    let fx = Fixture::new(&["shot_v003.blend"]);

    fx.cmd()
        .arg("publish")
        .arg(fx.path("shot_v003.blend"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Published"));

    let content = fs::read_to_string(fx.path("shot_published.blend")).unwrap();
    assert_eq!(content, "contents of shot_v003.blend");
    assert!(!fx.path("shot_v004.blend").exists());
}

#[test]
fn test_publish_is_repeatable() {
    let fx = Fixture::new(&["shot_v003.blend"]);

    for _ in 0..2 {
        let json = fx.json(&["publish", fx.path("shot_v003.blend").to_str().unwrap()]);
        assert_eq!(json["version_created"], false);
    }

    assert!(fx.path("shot_published.blend").is_file());
}

#[test]
fn test_publish_uses_configured_suffix() {
    let fx = Fixture::new(&["shot_v001.blend"]);
    fs::write(fx.path(".vsave.toml"), "publish_suffix = \"_final\"\n").unwrap();

    fx.cmd()
        .arg("publish")
        .arg(fx.path("shot_v001.blend"))
        .assert()
        .success();

    assert!(fx.path("shot_final.blend").is_file());
    assert!(!fx.path("shot_published.blend").exists());
}

// =============================================================================
// List / Resolve Tests
// =============================================================================

#[test]
fn test_list_groups_by_lineage() {
    let fx = Fixture::new(&[
        "proj.blend",
        "proj_v001.blend",
        "proj_v001_001.blend",
        "proj_published.blend",
        "other_v001.blend",
    ]);

    let json = fx.json(&["list", fx.path("proj_v001.blend").to_str().unwrap()]);

    assert_eq!(json["base_name"], "proj");
    let entries = json["entries"].as_array().unwrap();
    let names: Vec<_> = entries.iter().map(|e| e["name"].as_str().unwrap()).collect();
    assert_eq!(
        names,
        vec![
            "proj.blend",
            "proj_published.blend",
            "proj_v001.blend",
            "proj_v001_001.blend"
        ]
    );
    assert_eq!(entries[1]["published"], true);
    assert_eq!(entries[3]["indent"], 1);
    assert_eq!(json["current"], 2);
    assert!(entries[2]["modified"].is_string());
}

#[test]
fn test_list_text_marks_current() {
    let fx = Fixture::new(&["proj_v001.blend", "proj_v002.blend"]);

    fx.cmd()
        .arg("list")
        .arg(fx.path("proj_v002.blend"))
        .assert()
        .success()
        .stdout(predicate::str::contains("* proj_v002.blend"))
        .stdout(predicate::str::contains("2 file(s)"));
}

#[test]
fn test_resolve_listed_file() {
    let fx = Fixture::new(&["proj_v001.blend", "proj_v002.blend", "other.blend"]);
    let current = fx.path("proj_v002.blend");

    fx.cmd()
        .arg("resolve")
        .arg(&current)
        .arg("proj_v001.blend")
        .assert()
        .success()
        .stdout(predicate::str::contains("proj_v001.blend"));

    fx.cmd()
        .arg("resolve")
        .arg(&current)
        .arg("other.blend")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a version of this project"));
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_config_init_and_show() {
    let fx = Fixture::new(&[]);
    let dir = fx.dir.path().to_str().unwrap().to_string();

    fx.cmd()
        .args(["config", "init", &dir])
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote"));

    assert!(fx.path(".vsave.toml").is_file());

    let json = fx.json(&["config", "show", &dir]);
    assert_eq!(json["version_suffix"], "_v001");
    assert_eq!(json["digit_width"], 3);
    assert_eq!(json["branch_separator"], "_");
    assert_eq!(json["sources"].as_array().unwrap().len(), 1);
}

#[test]
fn test_global_config_is_applied() {
    let fx = Fixture::new(&["shot.ma"]);
    fs::write(fx.config.path().join("config.toml"), "extension = \"ma\"\n").unwrap();

    fx.cmd()
        .arg("next")
        .arg(fx.path("shot.ma"))
        .assert()
        .success()
        .stdout("shot_v001.ma\n");
}

#[test]
fn test_malformed_config_fails() {
    let fx = Fixture::new(&["shot.blend"]);
    fs::write(fx.path(".vsave.toml"), "version_suffix = [").unwrap();

    fx.cmd()
        .arg("next")
        .arg(fx.path("shot.blend"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}
