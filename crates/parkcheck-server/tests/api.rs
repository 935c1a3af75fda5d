//! End-to-end tests for the HTTP surface, driven through the router with
//! stub model and chat backends.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode};
use jiff::SignedDuration;
use serde_json::{Value, json};
use tower::ServiceExt;

use parkcheck_chat::ChatBackend;
use parkcheck_chat::error::ChatError;
use parkcheck_core::models::features::FeatureVector;
use parkcheck_core::models::label::Label;
use parkcheck_core::models::transcript::ChatEntry;
use parkcheck_model::adapter::ClassifierAdapter;
use parkcheck_model::{Classifier, Scaler};
use parkcheck_server::session::SessionStore;
use parkcheck_server::state::AppState;

struct Identity;

impl Scaler for Identity {
    fn transform(&self, row: &FeatureVector) -> FeatureVector {
        *row
    }
}

/// Positive when PPE (first training column) is above 0.2.
struct PpeThreshold;

impl Classifier for PpeThreshold {
    fn predict(&self, row: &FeatureVector) -> Label {
        if row.values()[0] > 0.2 {
            Label::Positive
        } else {
            Label::Negative
        }
    }
}

/// Replies from a script, one entry per request.
#[derive(Default)]
struct ScriptedChat {
    replies: Mutex<VecDeque<Result<String, ChatError>>>,
    requests: Mutex<Vec<Vec<ChatEntry>>>,
}

impl ScriptedChat {
    fn new(replies: Vec<Result<String, ChatError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::default(),
        })
    }
}

impl ChatBackend for ScriptedChat {
    fn complete(&self, messages: &[ChatEntry]) -> Result<String, ChatError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ChatError::Transport("script exhausted".into())))
    }
}

fn app_with(classifier: ClassifierAdapter, chat: Arc<ScriptedChat>) -> Router {
    parkcheck_server::router(AppState::new(classifier, chat))
}

fn app() -> Router {
    app_with(
        ClassifierAdapter::new(Identity, PpeThreshold),
        ScriptedChat::new(vec![]),
    )
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn new_session(app: &Router) -> String {
    let (status, body) = call(app, Method::POST, "/sessions", None).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

fn healthy_form() -> Value {
    json!({
        "ppe": "0.15",
        "fo": "197.076",
        "flo": "192.055",
        "ddp": "0.00331",
        "jitter_abs": "0.000009",
        "spread1": "-6.759264",
        "spread2": "0.167779",
        "fhi": "206.896",
        "nhr": "0.00339",
        "apq5": "0.00401",
    })
}

// ---------------------------------------------------------------------------
// Health and static data
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_model_and_sessions() {
    let app = app();
    new_session(&app).await;

    let (status, body) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model_loaded"], true);
    assert_eq!(body["chat_configured"], true);
    assert_eq!(body["sessions"], 1);
}

#[tokio::test]
async fn field_catalogue_is_in_form_order() {
    let (status, body) = call(&app(), Method::GET, "/clinical/fields", None).await;
    assert_eq!(status, StatusCode::OK);

    let keys: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["key"].as_str().unwrap())
        .collect();
    assert_eq!(
        keys,
        ["ppe", "fo", "flo", "ddp", "jitter_abs", "spread1", "spread2", "fhi", "nhr", "apq5"]
    );
}

#[tokio::test]
async fn questionnaire_lists_seven_questions() {
    let (status, body) = call(&app(), Method::GET, "/assessment", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["questions"].as_array().unwrap().len(), 7);
    assert_eq!(body["max_score"], 21);
    assert!(body["disclaimer"].as_str().unwrap().contains("not a diagnosis"));
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_session_is_not_found() {
    let app = app();
    let uri = format!("/sessions/{}/clinical", uuid::Uuid::new_v4());
    let (status, body) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("session not found"));
}

#[tokio::test]
async fn idle_session_expires() {
    let state = AppState::new(
        ClassifierAdapter::new(Identity, PpeThreshold),
        ScriptedChat::new(vec![]),
    )
    .with_session_ttl(SignedDuration::ZERO);
    let app = parkcheck_server::router(state);
    let id = new_session(&app).await;

    let (status, body) = call(&app, Method::GET, &format!("/sessions/{id}/clinical"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("session not found"));

    let (_, health) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(health["sessions"], 0);
}

#[tokio::test]
async fn sweep_drops_only_idle_sessions() {
    let store = SessionStore::new(SignedDuration::from_mins(30));
    let (old, created) = store.create().await;

    assert_eq!(store.evict_idle_at(created + SignedDuration::from_mins(29)).await, 0);
    assert!(store.get(old).await.is_some());

    let (fresh, _) = store.create().await;
    let later = jiff::Timestamp::now() + SignedDuration::from_mins(31);
    assert_eq!(store.evict_idle_at(later).await, 2);
    assert!(store.get(fresh).await.is_none());
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn deleted_session_is_gone() {
    let app = app();
    let id = new_session(&app).await;

    let (status, _) = call(&app, Method::DELETE, &format!("/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = call(&app, Method::DELETE, &format!("/sessions/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Clinical data test
// ---------------------------------------------------------------------------

#[tokio::test]
async fn healthy_reading_is_negative() {
    let app = app();
    let id = new_session(&app).await;

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/sessions/{id}/clinical"),
        Some(healthy_form()),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["label"], "negative");
    assert_eq!(body["class"], 0);
    assert_eq!(body["message"], "Test shows no signs of Parkinson's");
}

#[tokio::test]
async fn elevated_ppe_is_positive() {
    let app = app();
    let id = new_session(&app).await;
    let mut form = healthy_form();
    form["ppe"] = json!("0.45");

    let (status, body) =
        call(&app, Method::POST, &format!("/sessions/{id}/clinical"), Some(form)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["class"], 1);
    assert_eq!(body["message"], "Test shows signs of Parkinson's");
}

#[tokio::test]
async fn out_of_range_value_is_rejected_with_field_message() {
    let app = app();
    let id = new_session(&app).await;
    let mut form = healthy_form();
    form["fo"] = json!("300");

    let (status, body) =
        call(&app, Method::POST, &format!("/sessions/{id}/clinical"), Some(form)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "MDVP:Fo(Hz) must be between 60 and 260 Hz");
}

#[tokio::test]
async fn non_numeric_value_is_rejected() {
    let app = app();
    let id = new_session(&app).await;
    let mut form = healthy_form();
    form["nhr"] = json!("abc");

    let (status, body) =
        call(&app, Method::POST, &format!("/sessions/{id}/clinical"), Some(form)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "NHR must be a number");
}

#[tokio::test]
async fn rejected_form_is_kept_for_correction() {
    let app = app();
    let id = new_session(&app).await;
    let uri = format!("/sessions/{id}/clinical");
    let mut form = healthy_form();
    form["fo"] = json!("300");

    call(&app, Method::POST, &uri, Some(form)).await;
    let (status, body) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fo"], "300");
    assert_eq!(body["ppe"], "0.15");
}

#[tokio::test]
async fn clearing_the_form_empties_every_field() {
    let app = app();
    let id = new_session(&app).await;
    let uri = format!("/sessions/{id}/clinical");
    call(&app, Method::POST, &uri, Some(healthy_form())).await;

    let (status, body) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    for (_, value) in body.as_object().unwrap() {
        assert_eq!(value, "");
    }
}

#[tokio::test]
async fn missing_model_reports_unavailable_before_validation() {
    let app = app_with(ClassifierAdapter::unavailable(), ScriptedChat::new(vec![]));
    let id = new_session(&app).await;
    let mut form = healthy_form();
    form["fo"] = json!("not a number");

    let (status, body) =
        call(&app, Method::POST, &format!("/sessions/{id}/clinical"), Some(form)).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "model not loaded properly");

    let (_, health) = call(&app, Method::GET, "/health", None).await;
    assert_eq!(health["model_loaded"], false);
}

// ---------------------------------------------------------------------------
// Self assessment
// ---------------------------------------------------------------------------

#[tokio::test]
async fn answers_accumulate_one_question_at_a_time() {
    let app = app();
    let id = new_session(&app).await;

    let (status, body) = call(
        &app,
        Method::PUT,
        &format!("/sessions/{id}/assessment/1"),
        Some(json!({ "option": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answers"][0], 2);
    assert_eq!(body["complete"], false);

    let (_, body) = call(
        &app,
        Method::PUT,
        &format!("/sessions/{id}/assessment/5"),
        Some(json!({ "label": "Very soft" })),
    )
    .await;
    assert_eq!(body["answers"][4], 2);
    assert_eq!(body["missing"], json!([2, 3, 4, 6, 7]));
}

#[tokio::test]
async fn unknown_question_is_not_found() {
    let app = app();
    let id = new_session(&app).await;
    let (status, _) = call(
        &app,
        Method::PUT,
        &format!("/sessions/{id}/assessment/8"),
        Some(json!({ "option": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unknown_option_is_a_bad_request() {
    let app = app();
    let id = new_session(&app).await;
    let (status, _) = call(
        &app,
        Method::PUT,
        &format!("/sessions/{id}/assessment/1"),
        Some(json!({ "label": "Rarely" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn incomplete_assessment_is_rejected() {
    let app = app();
    let id = new_session(&app).await;
    let uri = format!("/sessions/{id}/assessment");
    call(
        &app,
        Method::PUT,
        &format!("{uri}/1"),
        Some(json!({ "option": 3 })),
    )
    .await;

    let (status, body) = call(&app, Method::POST, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("answer all questions"));
}

#[tokio::test]
async fn full_answer_set_scores_high_risk() {
    let app = app();
    let id = new_session(&app).await;

    let answers = json!([
        { "option": 3 }, { "option": 3 }, { "option": 3 }, { "option": 3 },
        { "option": 3 }, { "option": 3 }, { "option": 3 },
    ]);
    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/sessions/{id}/assessment"),
        Some(json!({ "answers": answers })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 21);
    assert_eq!(body["display_percentage"], 100);
    assert_eq!(body["tier"], "high");
    assert_eq!(body["tier_name"], "High Risk");
}

#[tokio::test]
async fn stored_answers_score_after_individual_selection() {
    let app = app();
    let id = new_session(&app).await;
    let uri = format!("/sessions/{id}/assessment");

    // 1 + 1 + 1 + 1 + 1 + 0 + 0 = 5 of 21, just under 25 %.
    for (question, option) in [(1, 1), (2, 1), (3, 1), (4, 1), (5, 1), (6, 0), (7, 0)] {
        let (status, _) = call(
            &app,
            Method::PUT,
            &format!("{uri}/{question}"),
            Some(json!({ "option": option })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = call(&app, Method::POST, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 5);
    assert_eq!(body["display_percentage"], 24);
    assert_eq!(body["tier"], "low");
}

#[tokio::test]
async fn wrong_answer_count_is_a_bad_request() {
    let app = app();
    let id = new_session(&app).await;
    let (status, _) = call(
        &app,
        Method::POST,
        &format!("/sessions/{id}/assessment"),
        Some(json!({ "answers": [{ "option": 0 }] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn reset_clears_every_answer() {
    let app = app();
    let id = new_session(&app).await;
    let uri = format!("/sessions/{id}/assessment");
    call(
        &app,
        Method::PUT,
        &format!("{uri}/3"),
        Some(json!({ "option": 1 })),
    )
    .await;

    let (status, body) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answers"], json!([null, null, null, null, null, null, null]));
    assert_eq!(body["complete"], false);
}

// ---------------------------------------------------------------------------
// Chat helper
// ---------------------------------------------------------------------------

#[tokio::test]
async fn chat_reply_is_appended_to_history() {
    let chat = ScriptedChat::new(vec![Ok("Tremor is a common early sign.".into())]);
    let app = app_with(ClassifierAdapter::new(Identity, PpeThreshold), chat.clone());
    let id = new_session(&app).await;

    let (status, body) = call(
        &app,
        Method::POST,
        &format!("/sessions/{id}/chat"),
        Some(json!({ "message": "What are early signs?" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"], "Tremor is a common early sign.");
    assert_eq!(body["state"], "ready");
    assert_eq!(
        body["messages"],
        json!([
            { "role": "user", "content": "What are early signs?" },
            { "role": "assistant", "content": "Tremor is a common early sign." },
        ])
    );

    // The backend sees the system instruction first.
    let requests = chat.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert!(matches!(requests[0][0], ChatEntry::System(_)));
}

#[tokio::test]
async fn chat_failure_is_a_bad_gateway_and_keeps_the_message() {
    let chat = ScriptedChat::new(vec![Err(ChatError::Transport("timed out".into()))]);
    let app = app_with(ClassifierAdapter::new(Identity, PpeThreshold), chat);
    let id = new_session(&app).await;
    let uri = format!("/sessions/{id}/chat");

    let (status, body) = call(&app, Method::POST, &uri, Some(json!({ "message": "Hello" }))).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("timed out"));

    let (_, view) = call(&app, Method::GET, &uri, None).await;
    assert_eq!(view["state"], "failed");
    assert_eq!(view["messages"], json!([{ "role": "user", "content": "Hello" }]));
}

#[tokio::test]
async fn unconfigured_chat_is_unavailable() {
    let chat = ScriptedChat::new(vec![Err(ChatError::NotConfigured)]);
    let app = app_with(ClassifierAdapter::new(Identity, PpeThreshold), chat);
    let id = new_session(&app).await;

    let (status, _) = call(
        &app,
        Method::POST,
        &format!("/sessions/{id}/chat"),
        Some(json!({ "message": "Hello" })),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn blank_message_is_rejected_without_calling_the_backend() {
    let chat = ScriptedChat::new(vec![]);
    let app = app_with(ClassifierAdapter::new(Identity, PpeThreshold), chat.clone());
    let id = new_session(&app).await;

    let (status, _) = call(
        &app,
        Method::POST,
        &format!("/sessions/{id}/chat"),
        Some(json!({ "message": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(chat.requests.lock().unwrap().is_empty());
}

#[tokio::test]
async fn clearing_chat_empties_history() {
    let chat = ScriptedChat::new(vec![Ok("Hi.".into())]);
    let app = app_with(ClassifierAdapter::new(Identity, PpeThreshold), chat);
    let id = new_session(&app).await;
    let uri = format!("/sessions/{id}/chat");
    call(&app, Method::POST, &uri, Some(json!({ "message": "Hello" }))).await;

    let (status, body) = call(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "empty");
    assert_eq!(body["messages"], json!([]));
}

#[tokio::test]
async fn sessions_do_not_share_state() {
    let app = app();
    let first = new_session(&app).await;
    let second = new_session(&app).await;

    call(
        &app,
        Method::PUT,
        &format!("/sessions/{first}/assessment/1"),
        Some(json!({ "option": 3 })),
    )
    .await;

    let (_, body) = call(&app, Method::GET, &format!("/sessions/{second}/assessment"), None).await;
    assert_eq!(body["answers"][0], Value::Null);
}
