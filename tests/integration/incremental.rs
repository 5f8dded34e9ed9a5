//! Incremental-mode deployments: changed files come from a GitHub compare.

use blockdeploy::deploy::Deployer;
use blockdeploy::source::{CommitDiffSource, GitHubClient};
use blockdeploy::store::BrazeClient;
use mockito::{Matcher, Server};
use serde_json::json;

#[tokio::test]
async fn test_deploys_only_changed_blocks() {
    let mut github = Server::new_async().await;
    let mut braze = Server::new_async().await;

    let _compare = github
        .mock("GET", "/repos/mockOwner/mockRepo/compare/mockBaseSha...mockHeadSha")
        .with_status(200)
        .with_body(
            json!({ "files": [
                { "filename": "content_blocks/file2.liquid", "status": "modified" },
                { "filename": "content_blocks/file1.liquid", "status": "added" },
                { "filename": "content_blocks/gone.liquid", "status": "removed" },
                { "filename": "src/app.js", "status": "modified" }
            ]})
            .to_string(),
        )
        .create_async()
        .await;
    let mut contents = Vec::new();
    for (path, body) in [
        ("content_blocks/file2.liquid", "Content of file2 {{content_blocks.${file1}}}"),
        ("content_blocks/file1.liquid", "Content of file1"),
    ] {
        let mock = github
            .mock("GET", format!("/repos/mockOwner/mockRepo/contents/{path}").as_str())
            .match_query(Matcher::UrlEncoded("ref".into(), "mockHeadSha".into()))
            .with_status(200)
            .with_body(body)
            .create_async()
            .await;
        contents.push(mock);
    }

    let _list = braze
        .mock("GET", "/content_blocks/list")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(json!({ "content_blocks": [
            { "name": "file2", "content_block_id": "id2" }
        ]}).to_string())
        .create_async()
        .await;
    let create = braze
        .mock("POST", "/content_blocks/create")
        .match_body(Matcher::Json(json!({ "name": "file1", "content": "Content of file1" })))
        .with_status(201)
        .with_body(r#"{"message":"success"}"#)
        .create_async()
        .await;
    let update = braze
        .mock("POST", "/content_blocks/update")
        .match_body(Matcher::Json(json!({
            "content_block_id": "id2",
            "content": "Content of file2 {{content_blocks.${file1}}}"
        })))
        .with_status(200)
        .with_body(r#"{"message":"success"}"#)
        .create_async()
        .await;
    let removed = github
        .mock("GET", "/repos/mockOwner/mockRepo/contents/content_blocks/gone.liquid")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let source = CommitDiffSource::new(
        GitHubClient::new(github.url(), Some("gh-token".to_string())).unwrap(),
        "mockOwner/mockRepo".parse().unwrap(),
        "mockBaseSha",
        "mockHeadSha",
        "content_blocks",
        vec!["liquid".to_string()],
    );
    let store = BrazeClient::new(braze.url(), "test-key").unwrap();
    let report = Deployer::new(store).run(&source).await.unwrap();

    create.assert_async().await;
    update.assert_async().await;
    removed.assert_async().await;
    for mock in &contents {
        mock.assert_async().await;
    }
    assert_eq!(report.planned, vec!["file1", "file2"]);
    assert_eq!(report.summary.created, vec!["file1"]);
    assert_eq!(report.summary.updated, vec!["file2"]);
}
