//! Integration tests for the full client stack: session persistence,
//! bearer attachment, the 401→refresh→retry protocol, and the stores,
//! over a scripted transport and the real file-backed session
//! repository.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use ladle_application::{
    ApiClient, ApiRequest, AuthStore, Filters, GuardDecision, HttpTransport, ListArgs,
    RawResponse, RecipeStore, RouteMeta, SessionStore, TransportError, guard,
};
use ladle_domain::{ClientConfig, Credentials, RecipeForm};
use ladle_infrastructure::{FileSessionRepository, InMemoryScratchStorage, TokioFileSystem};
use pretty_assertions::assert_eq;
use tempfile::{TempDir, tempdir};

/// Reply queues keyed by `"METHOD path"`; unscripted requests answer 500.
#[derive(Debug, Default, Clone)]
struct ScriptedTransport {
    state: Arc<ScriptState>,
}

#[derive(Debug, Default)]
struct ScriptState {
    scripts: Mutex<HashMap<String, VecDeque<(u16, String, u64)>>>,
    seen: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    fn respond(&self, key: &str, status: u16, body: &str) {
        self.respond_slow(key, status, body, 0);
    }

    fn respond_slow(&self, key: &str, status: u16, body: &str, delay_ms: u64) {
        self.state
            .scripts
            .lock()
            .unwrap()
            .entry(key.to_string())
            .or_default()
            .push_back((status, body.to_string(), delay_ms));
    }

    fn requests(&self) -> Vec<ApiRequest> {
        self.state.seen.lock().unwrap().clone()
    }

    fn count(&self, key: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| format!("{} {}", r.method, r.path) == key)
            .count()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        let key = format!("{} {}", request.method, request.path);
        self.state.seen.lock().unwrap().push(request);

        let reply = self
            .state
            .scripts
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front);

        match reply {
            Some((status, body, delay_ms)) => {
                if delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Ok(RawResponse::new(status, body.into_bytes()))
            }
            None => Ok(RawResponse::new(
                500,
                format!("no scripted reply for {key}").into_bytes(),
            )),
        }
    }
}

struct Stack {
    client: Arc<ApiClient<ScriptedTransport>>,
    session: SessionStore,
    transport: ScriptedTransport,
    data_dir: TempDir,
}

fn stack() -> Stack {
    let data_dir = tempdir().unwrap();
    let session = SessionStore::new(
        Arc::new(FileSessionRepository::new(
            TokioFileSystem::new(),
            data_dir.path(),
        )),
        Arc::new(InMemoryScratchStorage::new()),
    );
    let transport = ScriptedTransport::default();
    let client = Arc::new(ApiClient::new(
        transport.clone(),
        session.clone(),
        ClientConfig::default(),
    ));
    Stack {
        client,
        session,
        transport,
        data_dir,
    }
}

#[tokio::test]
async fn login_persists_the_session_across_restarts() {
    let stack = stack();
    stack.transport.respond(
        "POST /auth/login",
        200,
        r#"{"accessToken":"at-1","refreshToken":"rt-1","user":{"userNo":3,"name":"cook"}}"#,
    );

    let auth = AuthStore::new(Arc::clone(&stack.client));
    auth.login(&Credentials::new("a@b.c", "pw")).await.unwrap();

    // A fresh store over the same directory restores the session.
    let restored = SessionStore::new(
        Arc::new(FileSessionRepository::new(
            TokioFileSystem::new(),
            stack.data_dir.path(),
        )),
        Arc::new(InMemoryScratchStorage::new()),
    );
    restored.load().await.unwrap();

    assert!(restored.is_authenticated().await);
    assert_eq!(restored.access_token().await, "at-1");
    assert_eq!(restored.user().await.unwrap().name, "cook");
}

#[tokio::test]
async fn concurrent_401s_coalesce_into_one_refresh() {
    let stack = stack();
    stack.session.set_tokens(&ladle_domain::TokenPair {
        access_token: "stale".to_string(),
        refresh_token: Some("rt-1".to_string()),
    })
    .await;

    for _ in 0..3 {
        stack.transport.respond("GET /recipes", 401, "");
    }
    stack
        .transport
        .respond_slow("POST /auth/refresh", 200, r#"{"accessToken":"fresh"}"#, 20);
    for _ in 0..3 {
        stack.transport.respond("GET /recipes", 200, "[]");
    }

    let (a, b, c) = tokio::join!(
        stack.client.send(ApiRequest::get("/recipes")),
        stack.client.send(ApiRequest::get("/recipes")),
        stack.client.send(ApiRequest::get("/recipes")),
    );

    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(stack.transport.count("POST /auth/refresh"), 1);

    let retried: Vec<_> = stack
        .transport
        .requests()
        .into_iter()
        .filter(|r| r.path == "/recipes" && r.header("Authorization") == Some("Bearer fresh"))
        .collect();
    assert_eq!(retried.len(), 3);
}

#[tokio::test]
async fn failed_refresh_logs_out_everywhere_and_guards_redirect() {
    let stack = stack();
    stack
        .session
        .set_tokens(&ladle_domain::TokenPair {
            access_token: "stale".to_string(),
            refresh_token: Some("rt-1".to_string()),
        })
        .await;

    stack.transport.respond("GET /recipes", 401, "");
    stack.transport.respond("POST /auth/refresh", 401, "");
    stack.transport.respond("POST /auth/refresh", 401, "");

    let error = stack
        .client
        .send(ApiRequest::get("/recipes"))
        .await
        .unwrap_err();
    assert!(error.is_unauthorized());

    // Memory, durable storage, and navigation all see the logout.
    assert!(!stack.session.is_authenticated().await);
    let restored = SessionStore::new(
        Arc::new(FileSessionRepository::new(
            TokioFileSystem::new(),
            stack.data_dir.path(),
        )),
        Arc::new(InMemoryScratchStorage::new()),
    );
    restored.load().await.unwrap();
    assert!(!restored.is_authenticated().await);

    let decision = guard::evaluate(&stack.session, RouteMeta::protected(), "/recipes/7").await;
    assert_eq!(
        decision,
        GuardDecision::RedirectToLogin {
            redirect: "/recipes/7".to_string()
        }
    );

    // The next protected request carries no Authorization header.
    stack.transport.respond("GET /recipes", 200, "[]");
    stack
        .client
        .send(ApiRequest::get("/recipes"))
        .await
        .unwrap();
    let last = stack.transport.requests().pop().unwrap();
    assert_eq!(last.header("Authorization"), None);
}

#[tokio::test]
async fn create_then_detail_round_trips_the_form() {
    let stack = stack();
    stack
        .transport
        .respond("POST /recipes", 201, r#"{"boardNo":42}"#);
    stack.transport.respond(
        "GET /recipes/42",
        200,
        r#"{"boardNo":42,"title":"Egg drop soup","content":"whisk and pour","categoryNo":2}"#,
    );

    let recipes = RecipeStore::new(Arc::clone(&stack.client));
    let form = RecipeForm {
        title: "Egg drop soup".to_string(),
        content: "whisk and pour".to_string(),
        category_no: Some(2),
    };

    let board_no = recipes.create(&form).await.unwrap();
    recipes.fetch_detail(board_no).await;

    let selected = recipes.state().await.selected.unwrap();
    assert_eq!(selected.board_no, 42);
    assert_eq!(selected.title, form.title);
    assert_eq!(selected.content, form.content);
    assert_eq!(selected.category_no, form.category_no);
}

#[tokio::test]
async fn search_after_deep_pagination_resets_to_page_one() {
    let stack = stack();
    stack.transport.respond(
        "GET /recipes",
        200,
        r#"{"items":[],"page":7,"size":10,"total":90,"totalPages":9}"#,
    );
    stack.transport.respond("GET /recipes", 200, "[]");

    let recipes = RecipeStore::new(Arc::clone(&stack.client));
    recipes.fetch_list(ListArgs::page(7)).await;

    recipes
        .search(Filters {
            keyword: Some("egg".to_string()),
            category_no: None,
        })
        .await;

    let second = &stack.transport.requests()[1];
    assert!(
        second
            .query
            .contains(&("page".to_string(), "1".to_string()))
    );
    assert!(
        second
            .query
            .contains(&("keyword".to_string(), "egg".to_string()))
    );
    assert_eq!(recipes.state().await.page, 1);
}

#[tokio::test]
async fn refresh_endpoint_401_does_not_recurse() {
    let stack = stack();
    stack
        .session
        .set_tokens(&ladle_domain::TokenPair::access_only("stale"))
        .await;
    stack.transport.respond("POST /auth/refresh", 401, "");

    let error = stack
        .client
        .send(ApiRequest::post("/auth/refresh"))
        .await
        .unwrap_err();

    assert!(error.is_unauthorized());
    assert_eq!(stack.transport.count("POST /auth/refresh"), 1);
}
