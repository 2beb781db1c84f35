//! In-crate fakes for the ports, used by unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use ladle_domain::{ScratchToken, Session};

use crate::ports::{
    ApiRequest, HttpTransport, RawResponse, ScratchStorage, SessionStorage, StorageError,
    TransportError,
};
use crate::session::SessionStore;

/// Builds a session store over in-memory storage fakes.
pub(crate) fn session_store() -> SessionStore {
    SessionStore::new(
        Arc::new(MemorySessionStorage::default()),
        Arc::new(MemoryScratchStorage::default()),
    )
}

/// In-memory stand-in for the durable session record.
#[derive(Debug, Default)]
pub(crate) struct MemorySessionStorage {
    session: Mutex<Option<Session>>,
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn load(&self) -> Result<Option<Session>, StorageError> {
        Ok(self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone())
    }

    async fn save(&self, session: &Session) -> Result<(), StorageError> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = Some(session.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        *self.session.lock().unwrap_or_else(PoisonError::into_inner) = None;
        Ok(())
    }
}

/// In-memory stand-in for session-scoped storage.
#[derive(Debug, Default)]
pub(crate) struct MemoryScratchStorage {
    tokens: Mutex<HashMap<String, ScratchToken>>,
}

#[async_trait]
impl ScratchStorage for MemoryScratchStorage {
    async fn get(&self, key: &str) -> Option<ScratchToken> {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    async fn put(&self, key: &str, token: ScratchToken) {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), token);
    }

    async fn remove(&self, key: &str) {
        self.tokens
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

#[derive(Debug, Clone)]
enum Reply {
    Respond {
        status: u16,
        body: String,
        delay_ms: u64,
    },
    Fail(String),
}

#[derive(Debug, Default)]
struct ScriptState {
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    seen: Mutex<Vec<ApiRequest>>,
}

/// Transport fake with per-`"METHOD path"` reply queues.
///
/// Replies for the same key are consumed in the order they were scripted;
/// an unscripted request answers 500 so tests fail loudly. Clones share
/// state, so tests can keep a probe handle after moving the transport
/// into a client.
#[derive(Debug, Default, Clone)]
pub(crate) struct ScriptedTransport {
    state: Arc<ScriptState>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn push(&self, key: &str, reply: Reply) {
        self.state
            .scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.to_string())
            .or_default()
            .push_back(reply);
    }

    /// Queues one reply for `key` (e.g. `"GET /recipes"`).
    pub(crate) fn respond(&self, key: &str, status: u16, body: &str) {
        self.push(
            key,
            Reply::Respond {
                status,
                body: body.to_string(),
                delay_ms: 0,
            },
        );
    }

    /// Queues `n` identical replies for `key`.
    pub(crate) fn respond_n(&self, key: &str, status: u16, body: &str, n: usize) {
        for _ in 0..n {
            self.respond(key, status, body);
        }
    }

    /// Queues a reply delivered after `delay_ms`, to hold concurrent
    /// callers in flight.
    pub(crate) fn respond_slow(&self, key: &str, status: u16, body: &str, delay_ms: u64) {
        self.push(
            key,
            Reply::Respond {
                status,
                body: body.to_string(),
                delay_ms,
            },
        );
    }

    /// Queues a transport-level failure for `key`.
    pub(crate) fn fail(&self, key: &str, message: &str) {
        self.push(key, Reply::Fail(message.to_string()));
    }

    /// All requests seen so far, in arrival order.
    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.state
            .seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests matching `key`.
    pub(crate) fn count(&self, key: &str) -> usize {
        self.requests()
            .iter()
            .filter(|request| Self::key_of(request) == key)
            .count()
    }

    /// Bodies of the requests matching `key`, in arrival order.
    pub(crate) fn bodies(&self, key: &str) -> Vec<Option<serde_json::Value>> {
        self.requests()
            .iter()
            .filter(|request| Self::key_of(request) == key)
            .map(|request| request.body.clone())
            .collect()
    }

    fn key_of(request: &ApiRequest) -> String {
        format!("{} {}", request.method, request.path)
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: ApiRequest) -> Result<RawResponse, TransportError> {
        let key = Self::key_of(&request);
        self.state
            .seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        let reply = self
            .state
            .scripts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&key)
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Reply::Respond {
                status,
                body,
                delay_ms,
            }) => {
                if delay_ms > 0 {
                    tokio::time::sleep(Duration::from_millis(delay_ms)).await;
                }
                Ok(RawResponse::new(status, body.into_bytes()))
            }
            Some(Reply::Fail(message)) => Err(TransportError::Network(message)),
            None => Ok(RawResponse::new(
                500,
                format!("no scripted reply for {key}").into_bytes(),
            )),
        }
    }
}
