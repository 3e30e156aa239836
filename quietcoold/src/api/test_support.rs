//! Router test helpers backed by an in-memory hub

use crate::api::{create_router, AppState};
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request, Response},
    Router,
};
use http_body_util::BodyExt;
use quietcool_core::{QuietcoolError, Result};
use quietcool_hub::{CoapTransport, Method};
use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Default)]
struct StubState {
    uids: Vec<String>,
    resources: HashMap<String, Value>,
    failing: HashSet<String>,
    puts: Vec<(String, Value)>,
}

/// Transport that answers from an in-memory resource table.
///
/// Clones share the same table so a test can inspect what the router sent.
#[derive(Clone, Default)]
pub(crate) struct StubTransport {
    state: Arc<Mutex<StubState>>,
}

impl StubTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fan(self, uid: &str, hubid: &str) -> Self {
        self.with_fan_answering_as_hubid(uid, uid, hubid)
    }

    /// A listed fan whose resources report a different uid
    pub fn with_fan_answering_as(self, uid: &str, reported: &str) -> Self {
        self.with_fan_answering_as_hubid(uid, reported, "1")
    }

    fn with_fan_answering_as_hubid(self, uid: &str, reported: &str, hubid: &str) -> Self {
        {
            let mut state = self.state.lock().unwrap();
            state.uids.push(uid.to_string());
            state.resources.insert(
                format!("device/{}", uid),
                json!({
                    "uid": reported, "type": "fan", "name": format!("Fan {}", uid),
                    "version": "IT-BLH-V1.0", "config": "0", "model": "QC-ES-4.5",
                    "pincode": "1234", "role": "1", "online": "1", "status": "ok",
                    "hubid": hubid,
                }),
            );
            state.resources.insert(
                format!("control/{}", uid),
                json!({
                    "uid": reported, "mode": "TH", "sequence": "0", "speed": "3",
                    "duration": "1", "started": "0", "remaining": "0",
                    "source": "LOCAL", "input_1_value": "0",
                }),
            );
        }
        self
    }

    /// Requests for `path` fail as if the hub never answered
    pub fn with_failure(self, path: &str) -> Self {
        self.state.lock().unwrap().failing.insert(path.to_string());
        self
    }

    pub fn last_put(&self) -> Option<(String, Value)> {
        self.state.lock().unwrap().puts.last().cloned()
    }
}

#[async_trait]
impl CoapTransport for StubTransport {
    async fn send(
        &self,
        hub_address: &str,
        method: Method,
        path: &str,
        payload: Option<&[u8]>,
    ) -> Result<Vec<u8>> {
        let mut state = self.state.lock().unwrap();

        if state.failing.contains(path) {
            return Err(QuietcoolError::CommunicationFailure(format!(
                "No response from {} for {} {}",
                hub_address, method, path
            )));
        }

        if path == "uids" {
            let list: Vec<Value> = state.uids.iter().map(|uid| json!({ "uid": uid })).collect();
            return Ok(serde_json::to_vec(&list).unwrap());
        }

        if let (Method::Put, Some(payload)) = (method, payload) {
            let update: Value = serde_json::from_slice(payload).unwrap();
            state.puts.push((path.to_string(), update.clone()));
            if let (Some(Value::Object(resource)), Value::Object(update)) =
                (state.resources.get_mut(path), update)
            {
                resource.extend(update);
            }
        }

        match state.resources.get(path) {
            Some(resource) => Ok(serde_json::to_vec(resource).unwrap()),
            None => Err(QuietcoolError::InvalidResponse(format!(
                "Hub answered 4.04 for {}",
                path
            ))),
        }
    }
}

/// Router wired to a stub transport
pub(crate) struct TestApp {
    router: Router,
}

impl TestApp {
    pub fn new(transport: StubTransport) -> Self {
        let state = AppState::new(Arc::new(transport));
        Self {
            router: create_router(state),
        }
    }

    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub(crate) fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub(crate) fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Helper to extract response body as string
pub(crate) async fn body_string(body: Body) -> String {
    let bytes = body.collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
