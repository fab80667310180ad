use crate::api::helpers::TestContext;
use hyper::StatusCode;
use pretty_assertions::assert_eq;

#[tokio::test]
async fn it_should_report_liveness() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get("/health").await.unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header_exists("x-request-id");
}

#[tokio::test]
async fn it_should_report_readiness_for_in_memory_storage() {
    let ctx = TestContext::new().await.unwrap();

    let response = ctx.client.get("/health/ready").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json()["status"], "ready");
    assert_eq!(response.json()["database"], "in-memory");
}

#[tokio::test]
async fn it_should_issue_a_distinct_request_id_per_request() {
    let ctx = TestContext::new().await.unwrap();

    let first = ctx.client.get("/health").await.unwrap();
    let second = ctx.client.get("/health").await.unwrap();

    assert_ne!(first.header("x-request-id"), second.header("x-request-id"));
}
