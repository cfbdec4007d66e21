//! End-to-end tests for the `devtools` binary.

use std::fs;
use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// The binary, run inside `dir` with per-user settings isolated under it.
fn devtools(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("devtools").unwrap();
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".xdg"))
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("DEVTOOLS_SETTINGS");
    cmd
}

/// A SQLite project: `app/config/config.ini` and `blog.db` with users and posts.
fn blog_project() -> TempDir {
    let temp = TempDir::new().unwrap();
    let config_dir = temp.path().join("app/config");
    fs::create_dir_all(&config_dir).unwrap();
    fs::write(
        config_dir.join("config.ini"),
        "[database]\nadapter = Sqlite\ndbname = blog.db\n\n\
         [application]\nmodelsDir = app/models/\nbaseUri = /blog/\n",
    )
    .unwrap();

    let conn = rusqlite::Connection::open(temp.path().join("blog.db")).unwrap();
    conn.execute_batch(
        "CREATE TABLE users (
             id INTEGER PRIMARY KEY,
             email VARCHAR(120) NOT NULL,
             password TEXT
         );
         CREATE TABLE posts (
             id INTEGER PRIMARY KEY,
             user_id INTEGER NOT NULL REFERENCES users(id),
             title VARCHAR(200) NOT NULL
         );",
    )
    .unwrap();
    temp
}

// ── help / version ──────────────────────────────────────────────────────────

#[test]
fn test_help_flag() {
    let temp = TempDir::new().unwrap();
    devtools(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Generates project skeletons"))
        .stdout(predicate::str::contains("all-models"));
}

#[test]
fn test_short_help_shows_about() {
    let temp = TempDir::new().unwrap();
    devtools(temp.path())
        .arg("-h")
        .assert()
        .success()
        .stdout(predicate::str::contains("Phalcon developer tools"));
}

#[test]
fn test_no_color_accepts_any_value() {
    let temp = TempDir::new().unwrap();
    for value in ["1", "true", "yes"] {
        devtools(temp.path())
            .env("NO_COLOR", value)
            .arg("info")
            .assert()
            .success()
            .stdout(predicate::str::contains("DevTools Version"));
    }
}

#[test]
fn test_version_flag() {
    let temp = TempDir::new().unwrap();
    devtools(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_model_command_help() {
    let temp = TempDir::new().unwrap();
    devtools(temp.path())
        .args(["model", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--excludefields"))
        .stdout(predicate::str::contains("--get-set"))
        .stdout(predicate::str::contains("--fk"));
}

// ── model generation ────────────────────────────────────────────────────────

#[test]
fn test_all_models_with_relations() {
    let project = blog_project();
    devtools(project.path())
        .args(["all-models", "--relations", "--fk"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Posts.php"))
        .stdout(predicate::str::contains("Users.php"));

    let posts = fs::read_to_string(project.path().join("app/models/Posts.php")).unwrap();
    assert!(posts.contains("class Posts extends \\Phalcon\\Mvc\\Model"));
    assert!(posts.contains("$this->setSource(\"posts\");"));
    assert!(posts.contains("$this->belongsTo('user_id'"));
    assert!(posts.contains("'foreignKey' => true"));

    let users = fs::read_to_string(project.path().join("app/models/Users.php")).unwrap();
    assert!(users.contains("$this->hasMany('id'"));
    assert!(users.contains("'Posts'"));
}

#[test]
fn test_existing_model_is_skipped_without_force() {
    let project = blog_project();
    let models = project.path().join("app/models");
    fs::create_dir_all(&models).unwrap();
    fs::write(models.join("Users.php"), "<?php // hand written\n").unwrap();

    devtools(project.path())
        .args(["model", "users"])
        .assert()
        .success()
        .stdout(predicate::str::contains("skipped"));
    assert_eq!(
        fs::read_to_string(models.join("Users.php")).unwrap(),
        "<?php // hand written\n"
    );

    devtools(project.path())
        .args(["model", "users", "--force", "--excludefields", "password"])
        .assert()
        .success();
    let users = fs::read_to_string(models.join("Users.php")).unwrap();
    assert!(users.contains("$email"));
    assert!(!users.contains("$password"));
}

#[test]
fn test_relative_config_is_taken_from_directory() {
    let project = blog_project();
    let elsewhere = TempDir::new().unwrap();
    devtools(elsewhere.path())
        .arg("all-models")
        .arg("--directory")
        .arg(project.path())
        .args(["--config", "app/config/config.ini"])
        .assert()
        .success();

    assert!(project.path().join("app/models/Users.php").is_file());
    assert!(project.path().join("app/models/Posts.php").is_file());
    assert!(!elsewhere.path().join("app/models").exists());
}

#[test]
fn test_model_with_name_namespace_and_output() {
    let project = blog_project();
    devtools(project.path())
        .args([
            "model",
            "posts",
            "--name",
            "Article",
            "--namespace",
            "Blog\\Models",
            "--get-set",
            "--output",
            "src/Models",
        ])
        .assert()
        .success();

    let article = fs::read_to_string(project.path().join("src/Models/Article.php")).unwrap();
    assert!(article.contains("namespace Blog\\Models;"));
    assert!(article.contains("class Article extends"));
    assert!(article.contains("public function getTitle()"));
}

#[test]
fn test_model_json_report() {
    let project = blog_project();
    let out = devtools(project.path())
        .args(["--output-format", "json", "model", "users"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["written"].as_array().unwrap().len(), 1);
    assert!(value["skipped"].as_array().unwrap().is_empty());
}

// ── project ─────────────────────────────────────────────────────────────────

#[test]
fn test_project_simple_with_ini_and_volt() {
    let temp = TempDir::new().unwrap();
    devtools(temp.path())
        .args([
            "project",
            "store",
            "simple",
            "--use-config-ini",
            "--template-engine",
            "volt",
            "--yes",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("successfully created"));

    let root = temp.path().join("store");
    assert!(root.join(".phalcon").is_dir());
    assert!(root.join("public/index.php").is_file());
    assert!(root.join("app/config/config.ini").is_file());
    assert!(!root.join("app/config/config.php").exists());
    assert!(root.join("app/views/index/index.volt").is_file());
    assert!(!root.join("app/views/index/index.phtml").exists());
    assert!(!root.join("public/webtools.php").exists());
}

#[test]
fn test_project_micro_with_webtools_in_directory() {
    let temp = TempDir::new().unwrap();
    let parent = temp.path().join("www");
    fs::create_dir_all(&parent).unwrap();

    devtools(temp.path())
        .args(["project", "api", "micro", "www", "--enable-webtools", "--yes"])
        .assert()
        .success();

    let root = parent.join("api");
    assert!(root.join("app/app.php").is_file());
    assert!(root.join("app/config/config.php").is_file());
    assert!(root.join("public/webtools.php").is_file());
    assert!(root.join("public/webtools.config.php").is_file());
}

#[test]
fn test_project_dry_run_writes_nothing() {
    let temp = TempDir::new().unwrap();
    devtools(temp.path())
        .args(["project", "store", "cli", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("app/tasks/MainTask.php"));
    assert!(!temp.path().join("store").exists());
}

// ── info / completions / config ─────────────────────────────────────────────

#[test]
fn test_info_json_inside_project() {
    let project = blog_project();
    let out = devtools(project.path())
        .args(["--output-format", "json", "info"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    let sections = value["sections"].as_array().unwrap();
    assert_eq!(sections[0]["title"], "Versions");
    assert_eq!(sections[0]["entries"][0]["key"], "DevTools Version");
    assert_eq!(sections[0]["entries"][0]["value"], env!("CARGO_PKG_VERSION"));

    let uris = sections.iter().find(|s| s["title"] == "URIs").unwrap();
    assert!(uris.to_string().contains("/blog/webtools.php"));
}

#[test]
fn test_completions_bash() {
    let temp = TempDir::new().unwrap();
    devtools(temp.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("devtools"));
}

#[test]
fn test_config_init_then_get() {
    let temp = TempDir::new().unwrap();
    let settings = temp.path().join("settings.toml");
    fs::write(&settings, "").unwrap();

    devtools(temp.path())
        .args(["--settings", "settings.toml", "config", "init", "--force"])
        .assert()
        .success();
    assert!(fs::read_to_string(&settings).unwrap().contains("[project]"));

    devtools(temp.path())
        .env("DEVTOOLS_PROJECT__FLAVOR", "micro")
        .args(["--settings", "settings.toml", "config", "get", "project.flavor"])
        .assert()
        .success()
        .stdout(predicate::str::diff("micro\n"));
}
