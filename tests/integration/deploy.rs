//! Full-mode deployments against a mocked content store.

use blockdeploy::core::DeployError;
use blockdeploy::deploy::Deployer;
use blockdeploy::source::DirectorySource;
use blockdeploy::store::BrazeClient;
use blockdeploy::test_utils::init_test_logging;
use mockito::{Matcher, Server};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn workspace(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    let blocks = temp.path().join("content_blocks");
    for (path, content) in files {
        let full = blocks.join(path);
        fs::create_dir_all(full.parent().unwrap()).unwrap();
        fs::write(full, content).unwrap();
    }
    temp
}

fn source(temp: &TempDir) -> DirectorySource {
    DirectorySource::new(temp.path().join("content_blocks"), vec!["liquid".to_string()])
}

async fn mock_list(server: &mut Server, blocks: serde_json::Value) -> mockito::Mock {
    server
        .mock("GET", "/content_blocks/list")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("limit".into(), "1000".into()),
            Matcher::UrlEncoded("offset".into(), "0".into()),
        ]))
        .match_header("authorization", "Bearer test-key")
        .with_status(200)
        .with_body(json!({ "content_blocks": blocks, "message": "success" }).to_string())
        .create_async()
        .await
}

#[tokio::test]
async fn test_creates_blocks_dependency_first() {
    init_test_logging(None);
    let temp = workspace(&[
        ("file2.liquid", "Content of file2 {{content_blocks.${file1}}}"),
        ("nested/file1.liquid", "Content of file1"),
        ("notes.txt", "ignored"),
    ]);
    let mut server = Server::new_async().await;
    let list = mock_list(&mut server, json!([])).await;
    let create_file1 = server
        .mock("POST", "/content_blocks/create")
        .match_body(Matcher::Json(json!({ "name": "file1", "content": "Content of file1" })))
        .with_status(201)
        .with_body(r#"{"content_block_id":"id1","liquid_tag":"{{content_blocks.${file1}}}","message":"success"}"#)
        .create_async()
        .await;
    let create_file2 = server
        .mock("POST", "/content_blocks/create")
        .match_body(Matcher::Json(json!({
            "name": "file2",
            "content": "Content of file2 {{content_blocks.${file1}}}"
        })))
        .with_status(201)
        .with_body(r#"{"content_block_id":"id2","message":"success"}"#)
        .create_async()
        .await;

    let store = BrazeClient::new(server.url(), "test-key").unwrap();
    let report = Deployer::new(store).run(&source(&temp)).await.unwrap();

    list.assert_async().await;
    create_file1.assert_async().await;
    create_file2.assert_async().await;
    // nested/file1 sorts after file2 on disk but must be published first
    assert_eq!(report.planned, vec!["file1", "file2"]);
    assert_eq!(report.summary.created, vec!["file1", "file2"]);
}

#[tokio::test]
async fn test_updates_existing_block_by_id() {
    let temp = workspace(&[
        ("file1.liquid", "Content of file1"),
        ("file2.liquid", "Content of file2 {{content_blocks.${file1}}}"),
    ]);
    let mut server = Server::new_async().await;
    let _list = mock_list(&mut server, json!([{ "name": "file1", "content_block_id": "id1" }])).await;
    let update = server
        .mock("POST", "/content_blocks/update")
        .match_body(Matcher::Json(json!({
            "content_block_id": "id1",
            "content": "Content of file1"
        })))
        .with_status(200)
        .with_body(r#"{"message":"success"}"#)
        .create_async()
        .await;
    let create = server
        .mock("POST", "/content_blocks/create")
        .match_body(Matcher::PartialJson(json!({ "name": "file2" })))
        .with_status(201)
        .with_body(r#"{"message":"success"}"#)
        .create_async()
        .await;

    let store = BrazeClient::new(server.url(), "test-key").unwrap();
    let report = Deployer::new(store).run(&source(&temp)).await.unwrap();

    update.assert_async().await;
    create.assert_async().await;
    assert_eq!(report.summary.updated, vec!["file1"]);
    assert_eq!(report.summary.created, vec!["file2"]);
}

#[tokio::test]
async fn test_prefixed_deploy() {
    let temp = workspace(&[("header.liquid", "hi")]);
    let mut server = Server::new_async().await;
    let _list = mock_list(&mut server, json!([{ "name": "header", "content_block_id": "plain" }])).await;
    let create = server
        .mock("POST", "/content_blocks/create")
        .match_body(Matcher::Json(json!({ "name": "stg_header", "content": "hi" })))
        .with_status(201)
        .with_body(r#"{"message":"success"}"#)
        .create_async()
        .await;

    let store = BrazeClient::new(server.url(), "test-key").unwrap();
    let report = Deployer::new(store).with_prefix("stg_").run(&source(&temp)).await.unwrap();

    create.assert_async().await;
    assert_eq!(report.summary.created, vec!["stg_header"]);
}

#[tokio::test]
async fn test_missing_reference_makes_no_publish_calls() {
    let temp = workspace(&[("a.liquid", "{{content_blocks.${ghost}}}")]);
    let mut server = Server::new_async().await;
    let _list = mock_list(&mut server, json!([])).await;
    let publish = server
        .mock("POST", Matcher::Regex("^/content_blocks/(create|update)$".into()))
        .expect(0)
        .create_async()
        .await;

    let store = BrazeClient::new(server.url(), "test-key").unwrap();
    let err = Deployer::new(store).run(&source(&temp)).await.unwrap_err();

    publish.assert_async().await;
    assert!(matches!(
        err.downcast_ref::<DeployError>(),
        Some(DeployError::UnresolvedReference { name }) if name == "ghost"
    ));
}

#[tokio::test]
async fn test_publish_failure_stops_the_run() {
    let temp = workspace(&[
        ("a.liquid", "a"),
        ("b.liquid", "{{content_blocks.${a}}}"),
    ]);
    let mut server = Server::new_async().await;
    let _list = mock_list(&mut server, json!([])).await;
    let create_a = server
        .mock("POST", "/content_blocks/create")
        .match_body(Matcher::PartialJson(json!({ "name": "a" })))
        .with_status(400)
        .with_body(r#"{"message":"Content block name is invalid"}"#)
        .create_async()
        .await;
    let create_b = server
        .mock("POST", "/content_blocks/create")
        .match_body(Matcher::PartialJson(json!({ "name": "b" })))
        .expect(0)
        .create_async()
        .await;

    let store = BrazeClient::new(server.url(), "test-key").unwrap();
    let err = Deployer::new(store).run(&source(&temp)).await.unwrap_err();

    create_a.assert_async().await;
    create_b.assert_async().await;
    match err.downcast_ref::<DeployError>() {
        Some(DeployError::RemoteOperationFailure {
            operation,
            target,
            status,
            ..
        }) => {
            assert_eq!(operation, "create");
            assert_eq!(target, "a");
            assert_eq!(*status, Some(400));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}
