//! The `blockdeploy` binary.

use assert_cmd::Command;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use serde_json::json;
use std::fs;
use tempfile::TempDir;

/// Environment variables the binary reads that must not leak in from CI.
const ISOLATED_ENV: &[&str] = &[
    "BRAZE_API_KEY",
    "BRAZE_REST_ENDPOINT",
    "BRAZE_CONTENT_BLOCK_PREFIX",
    "DEPLOYMENT_MODE",
    "LOG_LEVEL",
    "RUST_LOG",
    "ACTIONS_STEP_DEBUG",
    "GITHUB_ACTIONS",
    "GITHUB_WORKSPACE",
    "GITHUB_REPOSITORY",
    "GITHUB_SHA",
    "GITHUB_TOKEN",
    "GITHUB_EVENT_PATH",
    "GITHUB_API_URL",
];

fn blockdeploy() -> Command {
    let mut cmd = Command::cargo_bin("blockdeploy").unwrap();
    for var in ISOLATED_ENV {
        cmd.env_remove(var);
    }
    cmd
}

fn workspace(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    let blocks = temp.path().join("content_blocks");
    fs::create_dir_all(&blocks).unwrap();
    for (name, content) in files {
        fs::write(blocks.join(name), content).unwrap();
    }
    temp
}

fn mock_empty_list(server: &mut Server) -> mockito::Mock {
    server
        .mock("GET", "/content_blocks/list")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({ "content_blocks": [] }).to_string())
        .create()
}

#[test]
fn test_deploy_from_environment() {
    let temp = workspace(&[
        ("file2.liquid", "Content of file2 {{content_blocks.${file1}}}"),
        ("file1.liquid", "Content of file1"),
    ]);
    let mut server = Server::new();
    let _list = mock_empty_list(&mut server);
    let create = server
        .mock("POST", "/content_blocks/create")
        .match_header("authorization", "Bearer env-key")
        .with_status(201)
        .with_body(r#"{"message":"success"}"#)
        .expect(2)
        .create();

    blockdeploy()
        .arg("deploy")
        .env("BRAZE_API_KEY", "env-key")
        .env("BRAZE_REST_ENDPOINT", server.url())
        .env("GITHUB_WORKSPACE", temp.path())
        .env("DEPLOYMENT_MODE", "init")
        .assert()
        .success()
        .stdout(predicate::str::contains("created 2, updated 0"));

    create.assert();
}

#[test]
fn test_plan_prints_order_without_publishing() {
    let temp = workspace(&[
        ("header.liquid", "{{content_blocks.${logo}}}"),
        ("logo.liquid", "<img>"),
    ]);
    fs::write(temp.path().join("blockdeploy.toml"), "prefix = \"stg_\"\n").unwrap();
    let mut server = Server::new();
    let _list = mock_empty_list(&mut server);
    let publish = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create();

    blockdeploy()
        .args(["plan", "--api-key", "k", "--endpoint", &server.url(), "--workspace"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout("stg_logo\nstg_header\n");

    publish.assert();
}

#[test]
fn test_cycle_fails_with_exit_code_one() {
    let temp = workspace(&[
        ("a.liquid", "{{content_blocks.${b}}}"),
        ("b.liquid", "{{content_blocks.${a}}}"),
    ]);
    let mut server = Server::new();
    let _list = mock_empty_list(&mut server);

    blockdeploy()
        .args(["deploy", "--api-key", "k", "--endpoint", &server.url(), "--workspace"])
        .arg(temp.path())
        .env("GITHUB_ACTIONS", "true")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("::error::Circular reference detected: a → b → a"))
        .stderr(predicate::str::contains("Circular reference detected"));
}

#[test]
fn test_missing_api_key_is_reported() {
    let temp = workspace(&[]);

    blockdeploy()
        .args(["deploy", "--endpoint", "http://127.0.0.1:1", "--workspace"])
        .arg(temp.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("API key"));
}
