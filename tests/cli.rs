//! CLI integration tests for the recipebox binary.
//!
//! Each test uses an isolated temp directory for the database and for the
//! user config directory, so tests can run in parallel safely.

#![allow(deprecated)] // Command::cargo_bin deprecation only affects custom build dirs

mod common;

use std::path::Path;

use assert_cmd::Command;
use assert_fs::TempDir;
use common::TestServer;
use predicates::prelude::*;
use serde_json::Value;

struct TestContext {
    temp_dir: TempDir,
}

impl TestContext {
    fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("failed to create temp dir"),
        }
    }

    fn data_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    fn data_dir_str(&self) -> String {
        self.data_dir().join("data").to_string_lossy().to_string()
    }

    fn home_dir(&self) -> std::path::PathBuf {
        self.data_dir().join("home")
    }

    /// A command with its own config directory and no credential env vars.
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("recipebox").expect("failed to find binary");
        cmd.env("NO_COLOR", "1")
            .env("HOME", self.home_dir())
            .env("XDG_CONFIG_HOME", self.home_dir().join(".config"))
            .env_remove("RECIPEBOX_SERVER_URL")
            .env_remove("RECIPEBOX_TOKEN")
            .env_remove("RECIPEBOX_PASSWORD");
        cmd
    }

    fn init(&self) -> assert_cmd::assert::Assert {
        self.cmd()
            .args(["init", "--data-dir", &self.data_dir_str()])
            .assert()
    }
}

#[test]
fn test_init_creates_database() {
    let ctx = TestContext::new();

    ctx.init()
        .success()
        .stdout(predicate::str::contains("Created database"));

    assert!(ctx.data_dir().join("data/recipebox.db").exists());

    ctx.init()
        .failure()
        .stderr(predicate::str::contains("Already initialized"));
}

#[test]
fn test_serve_requires_init() {
    let ctx = TestContext::new();

    ctx.cmd()
        .args(["serve", "--data-dir", &ctx.data_dir_str(), "--port", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Run 'recipebox init' first"));
}

#[test]
fn test_serve_rejects_out_of_range_session_ttl() {
    let ctx = TestContext::new();
    ctx.init().success();

    for ttl in ["--session-ttl-days=-1", "--session-ttl-days=100000000"] {
        ctx.cmd()
            .args(["serve", "--data-dir", &ctx.data_dir_str(), "--port", "0", ttl])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--session-ttl-days"));
    }

    ctx.cmd()
        .env("RECIPEBOX_SESSION_TTL_DAYS", "36501")
        .args(["serve", "--data-dir", &ctx.data_dir_str(), "--port", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("0..=36500"));
}

#[test]
fn test_browse_without_credentials() {
    let ctx = TestContext::new();

    ctx.cmd()
        .arg("browse")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[test]
fn test_partial_env_credentials_fail() {
    let ctx = TestContext::new();

    ctx.cmd()
        .env("RECIPEBOX_TOKEN", "rbx_12345678_123456789012345678901234")
        .arg("saved")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "RECIPEBOX_TOKEN is set but RECIPEBOX_SERVER_URL is missing",
        ));
}

#[test]
fn test_create_recipe_validates_before_sending() {
    let ctx = TestContext::new();

    // Nothing listens on the discard port; validation must fail first.
    ctx.cmd()
        .env("RECIPEBOX_SERVER_URL", "http://127.0.0.1:9")
        .env("RECIPEBOX_TOKEN", "rbx_12345678_123456789012345678901234")
        .args([
            "recipe",
            "create",
            "--title",
            "   ",
            "-i",
            "egg",
            "--instructions",
            "Boil.",
            "--non-interactive",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Title is required"));

    ctx.cmd()
        .env("RECIPEBOX_SERVER_URL", "http://127.0.0.1:9")
        .env("RECIPEBOX_TOKEN", "rbx_12345678_123456789012345678901234")
        .args([
            "recipe",
            "create",
            "--title",
            "Soup",
            "--instructions",
            "Boil.",
            "--non-interactive",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("At least one ingredient is required"));
}

#[test]
fn test_logout_without_credentials() {
    let ctx = TestContext::new();

    ctx.cmd()
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("No credentials found."));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_end_to_end_flow() {
    let server = TestServer::start().await;
    let ctx = TestContext::new();
    let url = server.base_url.clone();

    ctx.cmd()
        .args([
            "signup",
            "--server",
            &url,
            "--email",
            "jo@example.com",
            "--password",
            "secret123",
            "--non-interactive",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Account created for jo@example.com"));

    ctx.cmd()
        .args([
            "login",
            "--server",
            &url,
            "--email",
            "jo@example.com",
            "--password",
            "secret123",
            "--non-interactive",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in"));

    ctx.cmd()
        .args([
            "recipe",
            "create",
            "--title",
            "Pancakes",
            "-i",
            "egg",
            "-i",
            "flour",
            "--instructions",
            "Mix and fry.",
            "--cooking-time",
            "20 min",
            "--difficulty",
            "easy",
            "--category",
            "Breakfast",
            "--non-interactive",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Shared recipe 'Pancakes'"));

    let output = ctx
        .cmd()
        .args(["my-recipes", "--json"])
        .output()
        .expect("failed to run command");
    assert!(output.status.success());
    let recipes: Value = serde_json::from_slice(&output.stdout).expect("failed to parse JSON");
    let id = recipes[0]["id"].as_str().expect("recipe id").to_string();
    assert_eq!(recipes[0]["cooking_time"], 20);

    ctx.cmd()
        .args(["browse", "--search", "PANCAKE"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Pancakes"))
        .stdout(predicate::str::contains("Categories: Breakfast"));

    ctx.cmd()
        .args(["browse", "--difficulty", "hard"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No recipes found."));

    ctx.cmd()
        .args(["like", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Liked 'Pancakes' (1 like)"));

    ctx.cmd()
        .args(["like", "--toggle", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("Unliked 'Pancakes' (0 likes)"));

    ctx.cmd()
        .args(["comment", "add", &id, "Great with syrup", "--non-interactive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Great with syrup"));

    ctx.cmd()
        .args(["recipe", "show", &id])
        .assert()
        .success()
        .stdout(predicate::str::contains("  - flour"))
        .stdout(predicate::str::contains("Great with syrup"));

    ctx.cmd()
        .args(["recipe", "delete", &id, "--yes", "--non-interactive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted recipe 'Pancakes'"));

    ctx.cmd()
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out successfully."));
}
