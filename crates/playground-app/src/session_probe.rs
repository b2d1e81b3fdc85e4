// Identity probe: one startup request to learn who is signed in.
// The request runs on a background thread; the shell drains the result from
// its update tick. Results that land after shutdown are discarded.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::time::Duration;

use playground_core::{IdentityClient, IdentityResponse, ProbeError};
use reqwest::header::ACCEPT;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ──────────────────────────────────────────────
// Auth payload
// ──────────────────────────────────────────────

/// The signed-in identity, validated at the boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthInfo {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
impl AuthInfo {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            preferred_username: None,
            avatar_url: None,
            extra: Map::new(),
        }
    }
}

/// Absent until the probe resolves, and absent on any failure.
pub type AuthState = Option<AuthInfo>;

/// Collapse a probe result into auth state. Non-success statuses, transport
/// errors, and bodies without a string `id` all mean "not signed in".
pub fn resolve(result: Result<IdentityResponse, ProbeError>) -> AuthState {
    let response = match result {
        Ok(response) => response,
        Err(e) => {
            log::debug!("identity probe failed: {}", e);
            return None;
        }
    };

    if !response.is_success() {
        log::debug!("identity probe returned {}; unauthenticated", response.status);
        return None;
    }

    match serde_json::from_str::<AuthInfo>(&response.body) {
        Ok(auth) => {
            log::info!("signed in as {}", auth.id);
            Some(auth)
        }
        Err(e) => {
            log::warn!("identity payload rejected: {}", e);
            None
        }
    }
}

// ──────────────────────────────────────────────
// SessionProbe
// ──────────────────────────────────────────────

pub struct SessionProbe {
    rx: mpsc::Receiver<AuthState>,
    cancelled: Arc<AtomicBool>,
    settled: bool,
}

impl SessionProbe {
    /// Start the request on a background thread.
    pub fn spawn(client: Arc<dyn IdentityClient>) -> Self {
        let (tx, rx) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = cancelled.clone();

        let spawned = std::thread::Builder::new()
            .name("identity-probe".into())
            .spawn(move || {
                let auth = resolve(client.fetch_identity());
                if flag.load(Ordering::Acquire) {
                    log::debug!("identity probe finished after shutdown; dropped");
                    return;
                }
                let _ = tx.send(auth);
            });

        if let Err(e) = spawned {
            log::error!("Failed to spawn identity probe: {}", e);
        }

        Self {
            rx,
            cancelled,
            settled: false,
        }
    }

    /// Non-blocking. Returns the outcome once, the first time it is available.
    pub fn poll(&mut self) -> Option<AuthState> {
        if self.settled || self.is_cancelled() {
            return None;
        }
        match self.rx.try_recv() {
            Ok(auth) => self.settle(auth),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => self.settle(None),
        }
    }

    /// Block up to `timeout` for the outcome.
    pub fn wait(&mut self, timeout: Duration) -> Option<AuthState> {
        if self.settled || self.is_cancelled() {
            return None;
        }
        match self.rx.recv_timeout(timeout) {
            Ok(auth) => self.settle(auth),
            Err(mpsc::RecvTimeoutError::Timeout) => None,
            Err(mpsc::RecvTimeoutError::Disconnected) => self.settle(None),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    fn settle(&mut self, auth: AuthState) -> Option<AuthState> {
        self.settled = true;
        Some(auth)
    }
}

// ──────────────────────────────────────────────
// HttpIdentityClient
// ──────────────────────────────────────────────

/// GETs the identity endpoint with a blocking reqwest client.
pub struct HttpIdentityClient {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl HttpIdentityClient {
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self, ProbeError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProbeError::Network(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl IdentityClient for HttpIdentityClient {
    fn fetch_identity(&self) -> Result<IdentityResponse, ProbeError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| ProbeError::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response.text().map_err(|e| ProbeError::Body(e.to_string()))?;
        Ok(IdentityResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct FixedClient(u16, &'static str);

    impl IdentityClient for FixedClient {
        fn fetch_identity(&self) -> Result<IdentityResponse, ProbeError> {
            Ok(IdentityResponse {
                status: self.0,
                body: self.1.to_string(),
            })
        }
    }

    /// Blocks inside the request until the test releases it.
    struct GatedClient {
        gate: Mutex<mpsc::Receiver<()>>,
    }

    impl IdentityClient for GatedClient {
        fn fetch_identity(&self) -> Result<IdentityResponse, ProbeError> {
            let _ = self.gate.lock().unwrap().recv();
            Ok(IdentityResponse {
                status: 200,
                body: r#"{"id":"late"}"#.into(),
            })
        }
    }

    fn response(status: u16, body: &str) -> Result<IdentityResponse, ProbeError> {
        Ok(IdentityResponse {
            status,
            body: body.to_string(),
        })
    }

    #[test]
    fn ok_with_id_is_signed_in() {
        assert_eq!(resolve(response(200, r#"{"id":"u1"}"#)), Some(AuthInfo::new("u1")));
    }

    #[test]
    fn unauthorized_is_absent() {
        assert_eq!(resolve(response(401, r#"{"id":"u1"}"#)), None);
    }

    #[test]
    fn network_error_is_absent() {
        assert_eq!(resolve(Err(ProbeError::Network("refused".into()))), None);
    }

    #[test]
    fn malformed_payloads_are_absent() {
        assert_eq!(resolve(response(200, "not json")), None);
        assert_eq!(resolve(response(200, "[]")), None);
        assert_eq!(resolve(response(200, r#"{"id": 7}"#)), None);
        assert_eq!(resolve(response(200, r#"{"name": "no id"}"#)), None);
    }

    #[test]
    fn known_and_extra_fields_are_kept() {
        let auth = resolve(response(
            200,
            r#"{"id":"u2","name":"Ada","avatar_url":"https://x/a.png","isPro":true}"#,
        ))
        .unwrap();
        assert_eq!(auth.name.as_deref(), Some("Ada"));
        assert_eq!(auth.avatar_url.as_deref(), Some("https://x/a.png"));
        assert_eq!(auth.extra.get("isPro"), Some(&Value::Bool(true)));
    }

    #[test]
    fn probe_delivers_outcome_once() {
        let mut probe = SessionProbe::spawn(Arc::new(FixedClient(200, r#"{"id":"u1"}"#)));
        let outcome = probe.wait(Duration::from_secs(5));
        assert_eq!(outcome, Some(Some(AuthInfo::new("u1"))));
        assert!(probe.is_settled());
        assert_eq!(probe.poll(), None);
    }

    #[test]
    fn cancelled_probe_discards_late_result() {
        let (release, gate) = mpsc::channel();
        let mut probe = SessionProbe::spawn(Arc::new(GatedClient {
            gate: Mutex::new(gate),
        }));

        probe.cancel();
        release.send(()).unwrap();

        assert_eq!(probe.wait(Duration::from_millis(200)), None);
        assert_eq!(probe.poll(), None);
        assert!(!probe.is_settled());
    }

    // ──────────────────────────────────────────
    // HTTP client against a local server
    // ──────────────────────────────────────────

    fn serve_once(status: u16, body: &'static str) -> String {
        let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        std::thread::spawn(move || {
            if let Ok(request) = server.recv() {
                let response = tiny_http::Response::from_string(body)
                    .with_status_code(tiny_http::StatusCode(status));
                let _ = request.respond(response);
            }
        });
        format!("http://{}/api/@me", addr)
    }

    #[test]
    fn http_client_reads_success_body() {
        let endpoint = serve_once(200, r#"{"id":"u1"}"#);
        let client = HttpIdentityClient::new(&endpoint, Some(Duration::from_secs(5))).unwrap();
        assert_eq!(client.endpoint(), endpoint);

        let auth = resolve(client.fetch_identity());
        assert_eq!(auth, Some(AuthInfo::new("u1")));
    }

    #[test]
    fn http_client_reports_unauthorized_status() {
        let endpoint = serve_once(401, r#"{"error":"unauthorized"}"#);
        let client = HttpIdentityClient::new(&endpoint, Some(Duration::from_secs(5))).unwrap();

        let response = client.fetch_identity().unwrap();
        assert_eq!(response.status, 401);
        assert_eq!(resolve(Ok(response)), None);
    }

    #[test]
    fn http_client_unreachable_endpoint_is_absent() {
        let client =
            HttpIdentityClient::new("http://127.0.0.1:9/api/@me", Some(Duration::from_secs(2))).unwrap();
        assert_eq!(resolve(client.fetch_identity()), None);
    }
}
