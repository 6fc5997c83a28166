use super::*;
use crate::config::FailedTicketPolicy;
use crate::export::{FAILED_COUNT_HEADER, FAILED_TICKETS_HEADER};
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};


/// Config pointing the helpdesk client at a mock server
fn test_config(helpdesk: &MockServer) -> Config {
    let mut config = Config::default();
    config.helpdesk.api_base_template = format!("{}/api/v2", helpdesk.uri());
    config
}

/// Router backed by a real `HelpdeskClient` talking to `helpdesk`
fn test_router(config: Config) -> Router {
    let client = HelpdeskClient::new(config.helpdesk.clone()).unwrap();
    create_router(Arc::new(client), Arc::new(config))
}

/// Mount a conversations response for one ticket
async fn mount_ticket(helpdesk: &MockServer, ticket: u64, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(format!("/api/v2/tickets/{ticket}/conversations")))
        .respond_with(response)
        .mount(helpdesk)
        .await;
}

fn comments_json(comments: &[&str]) -> ResponseTemplate {
    let body: Vec<_> = comments
        .iter()
        .enumerate()
        .map(|(i, c)| serde_json::json!({"id": i, "body_text": c, "body": format!("<div>{c}</div>")}))
        .collect();
    ResponseTemplate::new(200).set_body_json(body)
}

fn form_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/export")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let helpdesk = MockServer::start().await;
    let app = test_router(test_config(&helpdesk));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert!(body.contains("ok"));
    assert!(body.contains(env!("CARGO_PKG_VERSION")));
}

#[tokio::test]
async fn test_openapi_spec_lists_export_route() {
    let helpdesk = MockServer::start().await;
    let app = test_router(test_config(&helpdesk));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let spec: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(spec["paths"]["/export"]["post"].is_object());
    assert!(spec["components"]["schemas"]["ExportForm"].is_object());
}

#[tokio::test]
async fn test_swagger_ui_can_be_disabled() {
    let helpdesk = MockServer::start().await;
    let mut config = test_config(&helpdesk);
    config.server.api.swagger_ui = false;
    let app = test_router(config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/swagger-ui/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_enabled() {
    let helpdesk = MockServer::start().await;
    let mut config = test_config(&helpdesk);
    config.server.api.cors_enabled = true;
    config.server.api.cors_origins = vec!["*".to_string()];
    let app = test_router(config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("Origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_cors_disabled() {
    let helpdesk = MockServer::start().await;
    let mut config = test_config(&helpdesk);
    config.server.api.cors_enabled = false;
    let app = test_router(config);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("Origin", "http://localhost:3000")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(
        !response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_cors_specific_origins() {
    let helpdesk = MockServer::start().await;
    let mut config = test_config(&helpdesk);
    config.server.api.cors_enabled = true;
    config.server.api.cors_origins = vec![
        "https://support.example.com".to_string(),
        "\n".to_string(),
    ];
    let app = test_router(config);

    let health_from = |origin: &'static str| {
        Request::builder()
            .uri("/health")
            .header("Origin", origin)
            .body(Body::empty())
            .unwrap()
    };

    let allowed = app
        .clone()
        .oneshot(health_from("https://support.example.com"))
        .await
        .unwrap();
    assert_eq!(allowed.status(), StatusCode::OK);
    assert_eq!(
        allowed.headers()["access-control-allow-origin"],
        "https://support.example.com"
    );

    let denied = app
        .oneshot(health_from("https://evil.example.com"))
        .await
        .unwrap();
    assert_eq!(denied.status(), StatusCode::OK);
    assert!(
        !denied
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_server_starts_and_responds_to_health() {
    let helpdesk = MockServer::start().await;
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let app = test_router(test_config(&helpdesk));
    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let response = reqwest::get(format!("http://{addr}/health")).await.unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    server_handle.abort();
}

#[tokio::test]
async fn test_start_api_server_rejects_invalid_config() {
    let mut config = Config::default();
    config.export.utc_offset_seconds = 100_000;
    let result = start_api_server(Arc::new(config)).await;
    assert!(matches!(result, Err(crate::Error::Config { .. })));
}

#[tokio::test]
async fn test_failed_ticket_policy_from_config_is_applied() {
    let helpdesk = MockServer::start().await;
    mount_ticket(&helpdesk, 1, ResponseTemplate::new(500)).await;

    let mut config = test_config(&helpdesk);
    config.export.failed_ticket_policy = FailedTicketPolicy::ErrorRow;
    let app = test_router(config);

    let response = app
        .oneshot(form_request(
            "loginMode=apiLogin&domain=acme&apiKey=k&genOptions=sequential&minTicket=1&maxTicket=1",
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[FAILED_TICKETS_HEADER], "1");
    let body = body_string(response).await;
    assert!(body.starts_with("Ticket ID,Comments\n1,[fetch failed] helpdesk returned HTTP 500"));
}
