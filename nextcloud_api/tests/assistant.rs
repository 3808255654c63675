use nextcloud_api::assistant::DeleteTask;
use nextcloud_api::{Error, RemoteOperation};
use reqwest::StatusCode;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

#[tokio::test]
async fn delete_task() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/ocs/v2.php/textprocessing/task/1"))
        .and(header("OCS-APIRequest", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            r#"{"ocs":{"meta":{"status":"ok","statuscode":200,"message":"OK"},"data":{}}}"#,
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;
    let client = common::client(&server.uri());

    let result = DeleteTask::new(1).execute(&client).await;
    assert!(result.is_success(), "{}", result.log_message());
    assert_eq!(result.status(), Some(StatusCode::OK));
}

#[tokio::test]
async fn delete_missing_task() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/ocs/v2.php/textprocessing/task/2"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;
    let client = common::client(&server.uri());

    let result = DeleteTask::new(2).execute(&client).await;
    assert!(!result.is_success());
    assert_eq!(result.status(), Some(StatusCode::NOT_FOUND));
    assert!(result.error().is_none());
}

#[tokio::test]
async fn only_ok_counts_as_deleted() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    let client = common::client(&server.uri());

    let result = DeleteTask::new(3).execute(&client).await;
    assert_eq!(result.status(), Some(StatusCode::NO_CONTENT));
    assert!(!result.is_success());
}

#[tokio::test]
async fn delete_task_unreachable_server() {
    let client = common::client("http://127.0.0.1:1");

    let result = DeleteTask::new(1).execute(&client).await;
    assert!(matches!(result.error(), Some(Error::Request(_))));
    assert_eq!(result.status(), None);
}
