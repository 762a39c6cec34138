// tests/session_test.rs - Integration test: session manager with mock provider

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pretty_assertions::assert_eq;

use chat_agent::core::session::{Session, SessionOptions};
use chat_agent::core::transcript;
use chat_agent::core::types::{Role, SessionSettings};
use chat_agent::infra::errors::{ChatError, ErrorCategory};
use chat_agent::provider::*;
use chat_agent::security::credentials::CredentialResolver;

/// What the mock should do on its next call.
enum Reply {
    Text(String),
    Fail(fn() -> ChatError),
}

/// A mock provider that returns canned replies without any network calls
/// and keeps every request it receives.
struct MockProvider {
    script: Mutex<Vec<Reply>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl MockProvider {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
        })
    }

    fn push(&self, reply: Reply) {
        self.script.lock().unwrap().insert(0, reply);
    }

    fn last_request(&self) -> ChatRequest {
        self.requests.lock().unwrap().last().cloned().unwrap()
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    fn id(&self) -> &str {
        "mock"
    }

    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ChatError> {
        let n = self.requests.lock().unwrap().len();
        let model = request.model.clone();
        self.requests.lock().unwrap().push(request);
        match self.script.lock().unwrap().pop() {
            Some(Reply::Text(content)) => Ok(ChatResponse { content, model }),
            Some(Reply::Fail(make)) => Err(make()),
            None => Ok(ChatResponse {
                content: format!("reply {}", n + 1),
                model,
            }),
        }
    }
}

fn resolver() -> CredentialResolver {
    CredentialResolver::new("CHAT_AGENT_SESSION_TEST_UNSET", "/nonexistent/.env")
        .with_explicit(Some("sk-test-0123456789abcdef".into()))
}

fn new_session(mock: &Arc<MockProvider>) -> Session {
    let provider: Arc<dyn CompletionProvider> = mock.clone();
    Session::create(
        SessionOptions::new("m1", "You are a helpful AI assistant."),
        &resolver(),
        |_| provider,
    )
    .unwrap()
}

fn pairs(session: &Session) -> Vec<(Role, String)> {
    session
        .history()
        .iter()
        .map(|m| (m.role, m.content.clone()))
        .collect()
}

#[tokio::test]
async fn test_scenario_a_single_successful_turn() {
    let mock = MockProvider::new();
    mock.push(Reply::Text("hello".into()));
    let mut session = new_session(&mock);

    let reply = session.submit_user_turn("hi").await.unwrap();

    assert_eq!(reply, "hello");
    assert_eq!(
        pairs(&session),
        vec![(Role::User, "hi".into()), (Role::Assistant, "hello".into())]
    );
}

#[tokio::test]
async fn test_scenario_b_rate_limited_turn_keeps_user_message() {
    let mock = MockProvider::new();
    mock.push(Reply::Text("hello".into()));
    mock.push(Reply::Fail(|| ChatError::RateLimited {
        message: "HTTP 429".into(),
    }));
    let mut session = new_session(&mock);

    session.submit_user_turn("hi").await.unwrap();
    let err = session.submit_user_turn("hi again").await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::RateLimit);
    assert!(err.user_message().contains("Rate limit exceeded"));
    assert_eq!(
        pairs(&session),
        vec![
            (Role::User, "hi".into()),
            (Role::Assistant, "hello".into()),
            (Role::User, "hi again".into()),
        ]
    );
}

#[tokio::test]
async fn test_failed_turn_appends_only_user_message() {
    let failures: [fn() -> ChatError; 4] = [
        || ChatError::AuthenticationFailure {
            message: "401".into(),
        },
        || ChatError::RateLimited {
            message: "429".into(),
        },
        || ChatError::TransientApi {
            message: "503".into(),
        },
        || ChatError::other("connection reset"),
    ];

    for make in failures {
        let mock = MockProvider::new();
        mock.push(Reply::Fail(make));
        let mut session = new_session(&mock);

        let err = session.submit_user_turn("question").await.unwrap_err();
        assert!(err.is_turn_failure());
        assert_eq!(session.len(), 1);
        assert_eq!(session.history()[0].role, Role::User);
    }
}

#[tokio::test]
async fn test_retry_resends_orphaned_user_turn() {
    let mock = MockProvider::new();
    mock.push(Reply::Fail(|| ChatError::TransientApi {
        message: "timeout".into(),
    }));
    mock.push(Reply::Text("answer".into()));
    let mut session = new_session(&mock);

    session.submit_user_turn("question").await.unwrap_err();
    session.submit_user_turn("question").await.unwrap();

    let request = mock.last_request();
    let contents: Vec<&str> = request.messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(
        contents,
        vec!["You are a helpful AI assistant.", "question", "question"]
    );
    assert_eq!(session.len(), 3);
}

#[tokio::test]
async fn test_history_grows_two_per_successful_turn() {
    let mock = MockProvider::new();
    let mut session = new_session(&mock);

    for k in 1..=7 {
        session.submit_user_turn(&format!("turn {k}")).await.unwrap();
        assert_eq!(session.len(), 2 * k);
    }

    for (i, m) in session.history().iter().enumerate() {
        let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
        assert_eq!(m.role, expected);
    }
    assert_eq!(session.history()[4].content, "turn 3");
}

#[tokio::test]
async fn test_scenario_c_context_window_trims_payload() {
    let mock = MockProvider::new();
    let mut session = new_session(&mock);

    for k in 1..=12 {
        session.submit_user_turn(&format!("user {k}")).await.unwrap();
    }
    assert_eq!(session.len(), 24);

    // When the 12th request is built the history holds the 22 messages of
    // the first 11 turns plus the new user message. Only the last 10 go out.
    let requests = mock.requests.lock().unwrap();
    let twelfth = &requests[11];
    assert_eq!(twelfth.messages.len(), 11);
    assert_eq!(twelfth.messages[0].role, Role::System);

    let sent: Vec<String> = twelfth.messages[1..]
        .iter()
        .map(|m| m.content.clone())
        .collect();
    let expected: Vec<String> = session.history()[13..23]
        .iter()
        .map(|m| m.content.clone())
        .collect();
    assert_eq!(sent, expected);
    assert_eq!(sent.last().unwrap(), "user 12");
}

#[tokio::test]
async fn test_payload_shape_for_every_history_length() {
    let mock = MockProvider::new();
    let provider: Arc<dyn CompletionProvider> = mock.clone();
    let settings = SessionSettings {
        context_window: 3,
        ..SessionSettings::default()
    };
    let mut session = Session::create(
        SessionOptions::new("m1", "sys").with_settings(settings),
        &resolver(),
        |_| provider,
    )
    .unwrap();

    for k in 0..6 {
        let request = session.build_request();
        assert_eq!(request.messages[0].role, Role::System);
        assert_eq!(request.messages.len(), 1 + session.len().min(3));
        session.submit_user_turn(&format!("m{k}")).await.unwrap();
    }
}

#[tokio::test]
async fn test_clear_keeps_prompt_and_model() {
    let mock = MockProvider::new();
    let mut session = new_session(&mock);
    session.submit_user_turn("hi").await.unwrap();
    session.submit_user_turn("again").await.unwrap();

    session.clear();
    assert!(session.is_empty());
    assert_eq!(session.model_id(), "m1");
    assert_eq!(session.system_prompt().role, Role::System);
    assert_eq!(
        session.system_prompt().content,
        "You are a helpful AI assistant."
    );

    session.clear();
    assert_eq!(session.len(), 0);

    session.submit_user_turn("fresh").await.unwrap();
    assert_eq!(mock.last_request().messages.len(), 2);
}

#[tokio::test]
async fn test_export_then_load_preserves_order() {
    let mock = MockProvider::new();
    let mut session = new_session(&mock);
    for text in ["first", "second", "third"] {
        session.submit_user_turn(text).await.unwrap();
    }
    let exported = session.export();
    assert_eq!(exported.len(), session.len());

    let dir = tempfile::tempdir().unwrap();
    let path = transcript::save(&exported, Some(&dir.path().join("conv.json"))).unwrap();
    let loaded = transcript::load(&path).unwrap();

    let loaded_pairs: Vec<(Role, String)> =
        loaded.iter().map(|m| (m.role, m.content.clone())).collect();
    assert_eq!(loaded_pairs, pairs(&session));
    for pair in loaded.windows(2) {
        assert!(pair[0].created_at <= pair[1].created_at);
    }
}

#[tokio::test]
async fn test_create_fails_without_credential() {
    let resolver = CredentialResolver::new("CHAT_AGENT_SESSION_TEST_UNSET", "/nonexistent/.env");
    let result = Session::create(SessionOptions::new("m1", "sys"), &resolver, |_| {
        MockProvider::new() as Arc<dyn CompletionProvider>
    });
    assert!(matches!(result, Err(ChatError::CredentialMissing)));
}
