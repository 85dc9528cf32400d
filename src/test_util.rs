//! Test doubles: a scripted in-memory gateway, a manual clock and an HTTP
//! stub of the eportal.

use crate::error::Result;
use crate::gateway::Gateway;
use crate::models::{LoginRequest, SessionStatus};
use crate::session::Clock;
use async_trait::async_trait;
use axum::extract::{Form, Query, State};
use axum::http::HeaderMap;
use axum::response::Html;
use axum::routing::get;
use axum::Router;
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

/// Gateway that replays a list of statuses, repeating the last one
pub struct ScriptedGateway {
    statuses: Mutex<VecDeque<SessionStatus>>,
    fetches: Mutex<usize>,
    logins: Mutex<Vec<LoginRequest>>,
    logouts: Mutex<Vec<(String, String)>>,
}

impl ScriptedGateway {
    pub fn always(status: SessionStatus) -> Self {
        Self::sequence(vec![status])
    }

    pub fn sequence(statuses: Vec<SessionStatus>) -> Self {
        assert!(!statuses.is_empty(), "script needs at least one status");
        Self {
            statuses: Mutex::new(statuses.into()),
            fetches: Mutex::new(0),
            logins: Mutex::new(Vec::new()),
            logouts: Mutex::new(Vec::new()),
        }
    }

    pub fn fetch_count(&self) -> usize {
        *self.fetches.lock().unwrap()
    }

    pub fn logins(&self) -> Vec<LoginRequest> {
        self.logins.lock().unwrap().clone()
    }

    pub fn logouts(&self) -> Vec<(String, String)> {
        self.logouts.lock().unwrap().clone()
    }
}

#[async_trait]
impl Gateway for ScriptedGateway {
    async fn fetch_status(&self) -> Result<SessionStatus> {
        *self.fetches.lock().unwrap() += 1;
        let mut statuses = self.statuses.lock().unwrap();
        let status = if statuses.len() > 1 {
            statuses.pop_front().unwrap()
        } else {
            statuses[0].clone()
        };
        Ok(status)
    }

    async fn submit_login(&self, request: &LoginRequest) -> Result<()> {
        self.logins.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn submit_logout(&mut self, client_ip: &str, full_account: &str) -> Result<()> {
        self.logouts
            .lock()
            .unwrap()
            .push((client_ip.to_string(), full_account.to_string()));
        Ok(())
    }
}

/// Clock that only moves when slept on
#[derive(Clone)]
pub struct FakeClock {
    start: Instant,
    offset: Arc<Mutex<Duration>>,
    sleeps: Arc<Mutex<Vec<Duration>>>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            offset: Arc::new(Mutex::new(Duration::ZERO)),
            sleeps: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn elapsed(&self) -> Duration {
        *self.offset.lock().unwrap()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.lock().unwrap().clone()
    }
}

#[async_trait]
impl Clock for FakeClock {
    fn now(&self) -> Instant {
        self.start + *self.offset.lock().unwrap()
    }

    async fn sleep(&self, duration: Duration) {
        *self.offset.lock().unwrap() += duration;
        self.sleeps.lock().unwrap().push(duration);
    }
}

/// One request seen by the stub eportal
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub query: HashMap<String, String>,
    pub form: HashMap<String, String>,
    pub referer: Option<String>,
    pub content_type: Option<String>,
    pub user_agent: Option<String>,
}

struct PortalState {
    password: String,
    session: Option<String>,
    requests: Vec<RecordedRequest>,
}

/// Minimal Dr.COM eportal: accepts one password, tracks one session
#[derive(Clone)]
pub struct StubPortal {
    state: Arc<Mutex<PortalState>>,
}

impl StubPortal {
    pub fn new(password: &str) -> Self {
        Self {
            state: Arc::new(Mutex::new(PortalState {
                password: password.to_string(),
                session: None,
                requests: Vec::new(),
            })),
        }
    }

    /// Requests made to the eportal endpoints, status fetches excluded
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().unwrap().requests.clone()
    }
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn status_page(State(portal): State<StubPortal>) -> Html<String> {
    let state = portal.state.lock().unwrap();
    let body = match &state.session {
        Some(account) => format!(
            "<html><head><title>注销页</title></head><script>uid='{}';v4ip='127.0.0.1';oltime=12;</script></html>",
            account
        ),
        None => "<html><head><title>登录页</title></head><script>v4ip='127.0.0.1';</script></html>"
            .to_string(),
    };
    Html(body)
}

async fn portal_action(
    State(portal): State<StubPortal>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> String {
    let mut state = portal.state.lock().unwrap();
    let callback = query.get("callback").cloned().unwrap_or_default();
    if query.get("a").map(String::as_str) == Some("logout") {
        state.session = None;
    }
    state.requests.push(RecordedRequest {
        method: "GET".to_string(),
        query,
        form: HashMap::new(),
        referer: header(&headers, "referer"),
        content_type: header(&headers, "content-type"),
        user_agent: header(&headers, "user-agent"),
    });
    format!("{}({{\"result\":\"1\"}})", callback)
}

async fn portal_login(
    State(portal): State<StubPortal>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Form(form): Form<HashMap<String, String>>,
) -> Html<&'static str> {
    let mut state = portal.state.lock().unwrap();
    if form.get("upass") == Some(&state.password) {
        state.session = form.get("DDDDD").cloned();
    }
    state.requests.push(RecordedRequest {
        method: "POST".to_string(),
        query,
        form,
        referer: header(&headers, "referer"),
        content_type: header(&headers, "content-type"),
        user_agent: header(&headers, "user-agent"),
    });
    Html("<html><title>认证成功页</title></html>")
}

/// Serve the stub on an ephemeral local port
pub async fn spawn_stub_portal(portal: StubPortal) -> (SocketAddr, StubPortal, JoinHandle<()>) {
    let app = Router::new()
        .route("/", get(status_page))
        .route("/eportal/", get(portal_action).post(portal_login))
        .with_state(portal.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (addr, portal, handle)
}
