use courier::http::{ApiRequest, BodyType, Client, HttpMethod, KeyValuePair};
use courier::{CourierError, execute};
use wiremock::matchers::{body_string, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_get_with_headers_and_query() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .and(query_param("page", "1"))
        .and(query_param_is_missing("limit"))
        .and(header("accept", "application/json"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"users":[]}"#, "application/json"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut request = ApiRequest::new("List", HttpMethod::Get, format!("{}/users", mock_server.uri()))
        .with_header("Accept", "application/json")
        .with_query("page", "1");
    request.query_params.push(KeyValuePair::disabled("limit", "10"));
    request.headers.push(KeyValuePair::disabled("X-Debug", "1"));

    let response = Client::new().execute(&request).await.unwrap();
    assert_eq!(response.status_code(), 200);
    assert_eq!(response.status_text(), "OK");
    assert!(response.is_success());
    assert_eq!(response.body.as_deref(), Some(r#"{"users":[]}"#));
    assert_eq!(response.content_type.as_deref(), Some("application/json"));
    assert!(response.response_time_ms > 0.0);

    let received = mock_server.received_requests().await.unwrap();
    assert!(received[0].headers.get("x-debug").is_none());
}

#[tokio::test]
async fn test_bearer_overrides_user_authorization() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = ApiRequest::new("r", HttpMethod::Get, mock_server.uri())
        .with_header("Authorization", "Basic stale")
        .with_auth_bearer("secret-token");

    let response = execute(&request).await.unwrap();
    assert_eq!(response.status_code(), 200);

    let received = mock_server.received_requests().await.unwrap();
    let values: Vec<_> = received[0].headers.get_all("authorization").iter().collect();
    assert_eq!(values.len(), 1);
}

#[tokio::test]
async fn test_basic_auth_header() {
    let mock_server = MockServer::start().await;
    Mock::given(header("authorization", "Basic dTpw"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request =
        ApiRequest::new("r", HttpMethod::Get, mock_server.uri()).with_auth_basic("u", "p");
    let response = Client::new().execute(&request).await.unwrap();
    assert_eq!(response.status_code(), 200);
}

#[tokio::test]
async fn test_json_body_gets_default_content_type() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/users"))
        .and(header("content-type", "application/json"))
        .and(body_string(r#"{"name":"Ann"}"#))
        .respond_with(ResponseTemplate::new(201).set_body_string(r#"{"id":7}"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = ApiRequest::new("c", HttpMethod::Post, format!("{}/users", mock_server.uri()))
        .with_json(r#"{"name":"Ann"}"#);
    let response = Client::new().execute(&request).await.unwrap();
    assert_eq!(response.status_code(), 201);
    assert_eq!(response.status_text(), "Created");
}

#[tokio::test]
async fn test_explicit_content_type_is_kept() {
    let mock_server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(header("content-type", "application/vnd.api+json"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = ApiRequest::new("u", HttpMethod::Put, mock_server.uri())
        .with_header("content-type", "application/vnd.api+json")
        .with_json("{}");
    Client::new().execute(&request).await.unwrap();

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received[0].headers.get_all("content-type").iter().count(), 1);
}

#[tokio::test]
async fn test_no_body_without_body_type() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let mut request = ApiRequest::new("p", HttpMethod::Post, mock_server.uri());
    request.body_content = "ignored".to_string();
    Client::new().execute(&request).await.unwrap();

    let empty = ApiRequest::new("p", HttpMethod::Post, mock_server.uri())
        .with_body(BodyType::Xml, "");
    Client::new().execute(&empty).await.unwrap();

    let received = mock_server.received_requests().await.unwrap();
    assert_eq!(received.len(), 2);
    for request in received {
        assert!(request.body.is_empty());
        assert!(request.headers.get("content-type").is_none());
    }
}

#[tokio::test]
async fn test_no_content_response() {
    let mock_server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&mock_server)
        .await;

    let request = ApiRequest::new("d", HttpMethod::Delete, format!("{}/items/1", mock_server.uri()));
    let response = Client::new().execute(&request).await.unwrap();

    assert_eq!(response.status_code(), 204);
    assert!(response.is_success());
    assert_eq!(response.size_bytes(), 0);
    assert!(response.text().is_empty());
}

#[tokio::test]
async fn test_non_utf8_body_is_none() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0xff, 0xfe, 0x00]))
        .mount(&mock_server)
        .await;

    let request = ApiRequest::new("b", HttpMethod::Get, mock_server.uri());
    let response = Client::new().execute(&request).await.unwrap();
    assert_eq!(response.body, None);
    assert_eq!(response.size_bytes(), 0);
}

#[tokio::test]
async fn test_unreachable_host_folds_into_sentinel() {
    let request = ApiRequest::new("down", HttpMethod::Get, "http://127.0.0.1:1/");

    let response = Client::new().execute(&request).await.unwrap();
    assert_eq!(response.status_code(), 0);
    assert!(response.is_transport_failure());
    assert!(!response.is_success());
    assert!(!response.text().is_empty());
}

#[tokio::test]
async fn test_send_reports_transport_error() {
    let request = ApiRequest::new("down", HttpMethod::Get, "http://127.0.0.1:1/");

    let result = Client::new().send(&request).await;
    assert!(matches!(result, Err(CourierError::Transport(_))));
}

#[tokio::test]
async fn test_invalid_url_is_an_error() {
    for url in ["", "   ", "http://"] {
        let request = ApiRequest::new("bad", HttpMethod::Get, url);
        let result = Client::new().execute(&request).await;
        assert!(
            matches!(result, Err(CourierError::InvalidUrl(_))),
            "expected InvalidUrl for {:?}",
            url
        );
    }
}
