//! Account and project service tests against a mock platform server

mod common;

use gooddata::account::AccountService;
use gooddata::domain::GoodDataError;
use gooddata::project::ProjectService;
use mockito::Server;
use serde_json::json;

fn service(server_url: &str) -> ProjectService {
    let client = common::rest_client(server_url);
    ProjectService::new(client.clone(), AccountService::new(client))
}

#[tokio::test]
async fn current_account_profile() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/gdc/account/profile/current")
        .match_header("authorization", mockito::Matcher::Regex("Basic .+".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::account_body())
        .create_async()
        .await;

    let client = common::rest_client(&server.url());
    let account = AccountService::new(client).get_current().await.unwrap();

    assert_eq!(account.login, "user@example.com");
    assert_eq!(account.id(), Some("ACCOUNT_ID"));
}

#[tokio::test]
async fn list_projects_follows_the_account_projects_link() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/gdc/account/profile/current")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(common::account_body())
        .create_async()
        .await;

    server
        .mock("GET", "/gdc/account/profile/ACCOUNT_ID/projects")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"projects": [
                {"project": {
                    "content": {"state": "ENABLED"},
                    "meta": {"title": "First", "uri": "/gdc/projects/p1"}
                }},
                {"project": {
                    "content": {"state": "ENABLED"},
                    "meta": {"title": "Second", "uri": "/gdc/projects/p2"}
                }}
            ]})
            .to_string(),
        )
        .create_async()
        .await;

    let projects = service(&server.url()).list_projects().await.unwrap();
    assert_eq!(projects.len(), 2);
    assert_eq!(projects[0].id(), Some("p1"));
    assert_eq!(projects[1].meta.title.as_deref(), Some("Second"));
}

#[tokio::test]
async fn get_project_by_id() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/gdc/projects/PROJECT_ID")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({"project": {
                "content": {"state": "ENABLED"},
                "meta": {"title": "Test project", "uri": "/gdc/projects/PROJECT_ID"}
            }})
            .to_string(),
        )
        .create_async()
        .await;

    let project = service(&server.url())
        .get_project_by_id("PROJECT_ID")
        .await
        .unwrap();
    assert_eq!(project.id(), Some("PROJECT_ID"));
}

#[tokio::test]
async fn unauthorized_request_surfaces_the_status() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/gdc/projects/PROJECT_ID")
        .with_status(401)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": {"message": "Unauthorized"}}"#)
        .create_async()
        .await;

    let result = service(&server.url()).get_project_by_id("PROJECT_ID").await;
    assert!(matches!(
        result,
        Err(GoodDataError::RestApi(e)) if e.status_code == 401
    ));
}
