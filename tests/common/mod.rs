#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::get;
use axum::Router;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use notebuddy::identity::{AuthError, CredentialProvider, LoginRequest, Session, UserIdentity};

pub const EMAIL: &str = "ada@example.com";
pub const PASSWORD: &str = "correct horse";

/// Blocks provider calls until opened.
#[derive(Clone)]
pub struct Gate(Arc<watch::Sender<bool>>);

impl Gate {
    pub fn closed() -> Self {
        Gate(Arc::new(watch::channel(false).0))
    }

    pub fn open(&self) {
        self.0.send_replace(true);
    }

    pub async fn wait(&self) {
        let mut rx = self.0.subscribe();
        let _ = rx.wait_for(|open| *open).await;
    }
}

/// Credential provider with scripted answers and call counters.
#[derive(Default)]
pub struct ScriptedProvider {
    pub held: Mutex<Option<Session>>,
    pub lookup_gate: Mutex<Option<Gate>>,
    pub sign_in_gate: Mutex<Option<Gate>>,
    pub lookup_fails: AtomicBool,
    pub sign_out_fails: AtomicBool,
    pub reset_fails: AtomicBool,
    pub lookups: AtomicUsize,
    pub sign_ins: AtomicUsize,
    pub sign_outs: AtomicUsize,
    pub resets: Mutex<Vec<(String, String)>>,
}

impl ScriptedProvider {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Provider that already holds a session for the test account.
    pub fn signed_in() -> Arc<Self> {
        let p = Self::default();
        *p.held.lock() = Some(session_for(EMAIL, "tok-existing"));
        Arc::new(p)
    }

    pub fn gate_lookups(&self) -> Gate {
        let g = Gate::closed();
        *self.lookup_gate.lock() = Some(g.clone());
        g
    }

    pub fn gate_sign_ins(&self) -> Gate {
        let g = Gate::closed();
        *self.sign_in_gate.lock() = Some(g.clone());
        g
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn sign_ins(&self) -> usize {
        self.sign_ins.load(Ordering::SeqCst)
    }

    pub fn sign_outs(&self) -> usize {
        self.sign_outs.load(Ordering::SeqCst)
    }
}

pub fn session_for(email: &str, token: &str) -> Session {
    Session::authenticated(UserIdentity::new("user-1", email), token)
}

#[async_trait]
impl CredentialProvider for ScriptedProvider {
    async fn current_session(&self) -> Result<Option<Session>, AuthError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        let gate = self.lookup_gate.lock().clone();
        if let Some(g) = gate {
            g.wait().await;
        }
        if self.lookup_fails.load(Ordering::SeqCst) {
            return Err(AuthError::new("lookup unavailable"));
        }
        Ok(self.held.lock().clone())
    }

    async fn sign_in_with_password(&self, req: &LoginRequest) -> Result<Session, AuthError> {
        self.sign_ins.fetch_add(1, Ordering::SeqCst);
        let gate = self.sign_in_gate.lock().clone();
        if let Some(g) = gate {
            g.wait().await;
        }
        if req.email != EMAIL || req.password != PASSWORD {
            return Err(AuthError::new("Invalid login credentials"));
        }
        let session = session_for(&req.email, &format!("tok-{}", self.sign_ins()));
        *self.held.lock() = Some(session.clone());
        Ok(session)
    }

    async fn sign_out(&self, _token: Option<&str>) -> Result<(), AuthError> {
        self.sign_outs.fetch_add(1, Ordering::SeqCst);
        if self.sign_out_fails.load(Ordering::SeqCst) {
            return Err(AuthError::new("network down"));
        }
        *self.held.lock() = None;
        Ok(())
    }

    async fn reset_password_for_email(&self, email: &str, redirect_to: &str) -> Result<(), AuthError> {
        if self.reset_fails.load(Ordering::SeqCst) {
            return Err(AuthError::new("For security purposes, you can only request this once every 60 seconds"));
        }
        self.resets.lock().push((email.to_string(), redirect_to.to_string()));
        Ok(())
    }
}

/// Wait until `cond` holds, polling briefly. Panics after one second.
pub async fn eventually(cond: impl Fn() -> bool) {
    for _ in 0..200 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached in time");
}

/// Serve `router` on an ephemeral localhost port. Returns the base URL.
pub async fn serve(router: Router) -> (String, JoinHandle<()>) {
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0)).await.expect("bind 127.0.0.1:0");
    let addr = listener.local_addr().expect("local addr");
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, router).await {
            eprintln!("mock server error: {e:?}");
        }
    });
    (format!("http://{}", addr), handle)
}

/// Base URL nothing is listening on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind(("127.0.0.1", 0)).expect("bind 127.0.0.1:0");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

#[derive(Clone, Default)]
pub struct Captured(pub Arc<Mutex<Vec<Option<String>>>>);

impl Captured {
    pub fn authorization(&self) -> Vec<Option<String>> {
        self.0.lock().clone()
    }
}

#[derive(Clone)]
struct RecordsReply {
    status: StatusCode,
    body: String,
    seen: Captured,
}

async fn records_handler(State(reply): State<RecordsReply>, headers: HeaderMap) -> (StatusCode, String) {
    let auth = headers.get("authorization").and_then(|v| v.to_str().ok()).map(str::to_string);
    reply.seen.0.lock().push(auth);
    (reply.status, reply.body)
}

/// Records API answering every request with `status` and `body`.
pub async fn records_api(status: u16, body: &str) -> (String, Captured, JoinHandle<()>) {
    let seen = Captured::default();
    let reply = RecordsReply {
        status: StatusCode::from_u16(status).expect("status"),
        body: body.to_string(),
        seen: seen.clone(),
    };
    let router = Router::new().route("/conversation-records", get(records_handler)).with_state(reply);
    let (url, handle) = serve(router).await;
    (url, seen, handle)
}
