//! Polling behaviour tests with the default handler

mod common;

use gooddata::client::{FutureResult, SimplePollHandler};
use gooddata::domain::GoodDataError;
use mockito::Server;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TaskState {
    summary: String,
}

#[tokio::test]
async fn pending_then_finished_with_cached_result() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/gdc/task/1")
        .with_status(202)
        .create_async()
        .await;

    let client = common::rest_client(&server.url());
    let handler: SimplePollHandler<TaskState> = SimplePollHandler::new("/gdc/task/1");
    let mut result = FutureResult::new(client, Box::new(handler));

    assert_eq!(result.polling_uri(), "/gdc/task/1");
    assert!(!result.is_done().await.unwrap());
    assert!(!result.is_done().await.unwrap());

    let finished = server
        .mock("GET", "/gdc/task/1")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"summary": "done"}"#)
        .expect(1)
        .create_async()
        .await;

    assert!(result.is_done().await.unwrap());
    // no further request once finished
    assert!(result.is_done().await.unwrap());
    finished.assert_async().await;

    let state = result.wait_for().await.unwrap();
    assert_eq!(state.summary, "done");
}

#[tokio::test]
async fn unexpected_status_fails_the_poll() {
    let mut server = Server::new_async().await;

    server
        .mock("GET", "/gdc/task/1")
        .with_status(409)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error": {"message": "task conflict"}}"#)
        .create_async()
        .await;

    let client = common::rest_client(&server.url());
    let handler: SimplePollHandler<TaskState> = SimplePollHandler::new("/gdc/task/1");
    let mut result = FutureResult::new(client, Box::new(handler));

    match result.is_done().await {
        Err(GoodDataError::RestApi(e)) => {
            assert_eq!(e.status_code, 409);
            assert_eq!(e.message, "task conflict");
        }
        other => panic!("expected a REST error, got {other:?}"),
    }
}

#[tokio::test]
async fn wait_for_gives_up_after_the_attempt_limit() {
    let mut server = Server::new_async().await;

    let forever_pending = server
        .mock("GET", "/gdc/task/1")
        .with_status(202)
        .expect(10)
        .create_async()
        .await;

    let client = common::rest_client(&server.url());
    let handler: SimplePollHandler<TaskState> = SimplePollHandler::new("/gdc/task/1");
    let result = FutureResult::new(client, Box::new(handler)).wait_for().await;

    assert!(matches!(result, Err(GoodDataError::Polling(_))));
    forever_pending.assert_async().await;
}
