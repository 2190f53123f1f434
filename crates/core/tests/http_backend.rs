use axum::{Json, Router, http::StatusCode, response::IntoResponse, routing::post};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use teachback_core::{
    BackendError, Endpoints, EventMap, HttpBackend, Message, Notification, SessionStats,
    SessionView, SessionViewController, TeachingBackend, ViewState, protocol::Trend,
};

/// Serves `router` on an ephemeral local port and returns its base URL.
async fn spawn_server(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

fn teaching_service(received: Arc<Mutex<Vec<Value>>>) -> Router {
    let on_start = received.clone();
    let on_step = received.clone();
    Router::new()
        .route(
            "/start_teaching",
            post(move |Json(body): Json<Value>| {
                let received = on_start.clone();
                async move {
                    received.lock().unwrap().push(body.clone());
                    Json(json!({
                        "ai_response": format!("I want to learn about {}!", body["topic"].as_str().unwrap_or("")),
                        "session_started": true,
                        "topic": body["topic"],
                        "confusion_level": 1
                    }))
                }
            }),
        )
        .route(
            "/teach_step",
            post(move |Json(body): Json<Value>| {
                let received = on_step.clone();
                async move {
                    received.lock().unwrap().push(body);
                    Json(json!({
                        "ai_response": "Wait, why does that happen?",
                        "quality_score": 0.6,
                        "exchanges_count": 1,
                        "session_progress": {
                            "average_quality": 0.6,
                            "exchanges": 1,
                            "improvement_trend": "neutral",
                            "confusion_level": 1,
                            "session_duration": 0.2,
                            "latest_score": 0.6,
                            "correction_mode": false,
                            "corrections_made": 0
                        }
                    }))
                }
            }),
        )
        .route(
            "/reset_session",
            post(|| async {
                Json(json!({"status": "success", "message": "Session reset successfully"}))
            }),
        )
}

#[tokio::test]
async fn test_start_posts_topic() {
    let received = Arc::new(Mutex::new(Vec::new()));
    let base = spawn_server(teaching_service(received.clone())).await;
    let backend = HttpBackend::new(&base, Endpoints::default()).unwrap();

    let response = backend.start_teaching("Chess").await.unwrap();

    assert_eq!(response.ai_response, "I want to learn about Chess!");
    assert_eq!(response.topic.as_deref(), Some("Chess"));
    assert_eq!(response.confusion_level, Some(1));
    assert_eq!(received.lock().unwrap()[0], json!({"topic": "Chess"}));
}

#[tokio::test]
async fn test_step_posts_explanation() {
    let received = Arc::new(Mutex::new(Vec::new()));
    let base = spawn_server(teaching_service(received.clone())).await;
    let backend = HttpBackend::new(&base, Endpoints::default()).unwrap();

    let response = backend.teach_step("Light is absorbed").await.unwrap();

    assert_eq!(response.exchanges_count, 1);
    assert_eq!(response.session_progress.improvement_trend, Trend::Neutral);
    assert_eq!(response.session_progress.latest_score, Some(0.6));
    assert_eq!(
        received.lock().unwrap()[0],
        json!({"explanation": "Light is absorbed"})
    );
}

#[tokio::test]
async fn test_reset_reads_message() {
    let base = spawn_server(teaching_service(Arc::default())).await;
    let backend = HttpBackend::new(&base, Endpoints::default()).unwrap();

    let response = backend.reset_session().await.unwrap();
    assert_eq!(response.message.as_deref(), Some("Session reset successfully"));
}

#[tokio::test]
async fn test_reset_accepts_empty_body() {
    let router = Router::new().route("/reset_session", post(|| async { StatusCode::OK }));
    let base = spawn_server(router).await;
    let backend = HttpBackend::new(&base, Endpoints::default()).unwrap();

    let response = backend.reset_session().await.unwrap();
    assert_eq!(response.message, None);
}

#[tokio::test]
async fn test_error_body_is_reported() {
    let router = Router::new().route(
        "/start_teaching",
        post(|| async {
            (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Please provide a topic to teach"})),
            )
                .into_response()
        }),
    );
    let base = spawn_server(router).await;
    let backend = HttpBackend::new(&base, Endpoints::default()).unwrap();

    let err = backend.start_teaching("Chess").await.unwrap_err();
    match err {
        BackendError::Status { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message.as_deref(), Some("Please provide a topic to teach"));
        }
        other => panic!("Expected Status error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_error_without_json_body() {
    let router = Router::new().route(
        "/teach_step",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response() }),
    );
    let base = spawn_server(router).await;
    let backend = HttpBackend::new(&base, Endpoints::default()).unwrap();

    let err = backend.teach_step("anything").await.unwrap_err();
    assert!(matches!(
        err,
        BackendError::Status {
            status: 500,
            message: None
        }
    ));
    assert_eq!(err.user_message("fallback"), "fallback");
}

#[tokio::test]
async fn test_malformed_success_body_is_decode_error() {
    let router = Router::new().route("/teach_step", post(|| async { "not json" }));
    let base = spawn_server(router).await;
    let backend = HttpBackend::new(&base, Endpoints::default()).unwrap();

    let err = backend.teach_step("anything").await.unwrap_err();
    assert!(matches!(err, BackendError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_service_is_transport_error() {
    // Bind then drop to get a port with nothing listening.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let backend = HttpBackend::new(&format!("http://{}", addr), Endpoints::default()).unwrap();

    let err = backend.start_teaching("Chess").await.unwrap_err();
    assert!(matches!(err, BackendError::Transport(_)));
}

#[tokio::test]
async fn test_custom_endpoints() {
    let router = Router::new().route(
        "/api/start",
        post(|| async { Json(json!({"ai_response": "Hello from the api prefix"})) }),
    );
    let base = spawn_server(router).await;
    let endpoints = Endpoints {
        start: "/api/start".to_string(),
        ..Endpoints::default()
    };
    let backend = HttpBackend::new(&base, endpoints).unwrap();

    let response = backend.start_teaching("Chess").await.unwrap();
    assert_eq!(response.ai_response, "Hello from the api prefix");
}

/// Minimal view that keeps only what the assertions need.
#[derive(Default)]
struct TranscriptView {
    lines: Vec<String>,
    notices: Vec<String>,
    stats: Option<SessionStats>,
    screen: Option<ViewState>,
}

impl SessionView for TranscriptView {
    fn show_view(&mut self, view: ViewState) {
        self.screen = Some(view);
    }
    fn set_loading(&mut self, _: bool) {}
    fn append_message(&mut self, message: &Message) {
        self.lines
            .push(format!("{}: {}", message.role(), message.text()));
    }
    fn clear_messages(&mut self) {
        self.lines.clear();
    }
    fn show_typing(&mut self) {}
    fn hide_typing(&mut self) {}
    fn render_stats(&mut self, stats: &SessionStats) {
        self.stats = Some(stats.clone());
    }
    fn set_topic_input(&mut self, _: &str) {}
    fn clear_topic_input(&mut self) {}
    fn clear_teaching_input(&mut self) {}
    fn update_char_count(&mut self, _: usize) {}
    fn notify(&mut self, notification: Notification) {
        self.notices.push(notification.message);
    }
}

#[tokio::test]
async fn test_full_session_over_http() {
    let base = spawn_server(teaching_service(Arc::default())).await;
    let backend = HttpBackend::new(&base, Endpoints::default()).unwrap();
    let mut controller =
        SessionViewController::new(TranscriptView::default(), backend, EventMap::standard());

    controller.start_session("Photosynthesis").await.unwrap();
    controller
        .submit_explanation("Plants turn light into sugar.")
        .await
        .unwrap();

    assert_eq!(controller.view().screen, Some(ViewState::Teaching));
    assert_eq!(
        controller.view().lines,
        vec![
            "assistant: I want to learn about Photosynthesis!",
            "user: Plants turn light into sugar.",
            "assistant: Wait, why does that happen?",
        ]
    );
    assert_eq!(controller.view().stats.as_ref().unwrap().exchanges_count, 1);

    controller.reset_session().await.unwrap();
    assert!(controller.view().lines.is_empty());
    assert_eq!(controller.view().notices, vec!["Session reset successfully"]);

    controller.return_to_welcome();
    assert_eq!(controller.view().screen, Some(ViewState::Welcome));
}
