use fmcache::{Error, LastfmApi, LastfmClient};
use mockito::Matcher;
use serde_json::json;

#[tokio::test]
async fn request_sends_method_key_and_format() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("method".into(), "tag.getInfo".into()),
            Matcher::UrlEncoded("api_key".into(), "test-key".into()),
            Matcher::UrlEncoded("format".into(), "json".into()),
            Matcher::UrlEncoded("tag".into(), "rock".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"tag": {"name": "rock"}}"#)
        .create_async()
        .await;

    let client = LastfmClient::new(server.url(), "test-key");
    let body = client
        .request("tag.getInfo", &[("tag", "rock")])
        .await
        .unwrap();

    assert_eq!(body["tag"]["name"], json!("rock"));
    mock.assert_async().await;
}

#[tokio::test]
async fn non_200_status_is_an_upstream_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let client = LastfmClient::new(server.url(), "test-key");
    let err = client.request("tag.getInfo", &[]).await.unwrap_err();

    match err {
        Error::UpstreamStatus(status) => assert_eq!(status, 503),
        other => panic!("expected UpstreamStatus, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_host_is_a_network_error() {
    let client = LastfmClient::new("http://127.0.0.1:1/", "test-key");
    let err = client.request("tag.getInfo", &[]).await.unwrap_err();

    match err {
        Error::Network(_) => (),
        other => panic!("expected Network, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("<html>definitely not json</html>")
        .create_async()
        .await;

    let client = LastfmClient::new(server.url(), "test-key");
    assert!(client.request("tag.getInfo", &[]).await.is_err());
}
