//! Stub hub for unit tests
//!
//! Serves canned JSON per resource path without any networking.

use crate::coap::Method;
use crate::transport::CoapTransport;
use async_trait::async_trait;
use quietcool_core::{QuietcoolError, Result};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// What the stub does for one resource path
#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Json(Value),
    Raw(Vec<u8>),
    Delayed(Duration, Value),
    Unreachable,
    Hang,
}

/// A request the stub received
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SentRequest {
    pub hub_address: String,
    pub method: Method,
    pub path: String,
    pub payload: Option<Value>,
}

pub(crate) struct StubHub {
    uids: Vec<String>,
    replies: Mutex<HashMap<String, Reply>>,
    sent: Mutex<Vec<SentRequest>>,
}

pub(crate) fn device_json(uid: &str, hubid: &str) -> Value {
    json!({
        "uid": uid,
        "type": "fan",
        "name": format!("Fan {}", uid),
        "version": "IT-BLH-V1.0",
        "config": "0",
        "model": "QC-ES-4.5",
        "pincode": "1234",
        "role": "1",
        "online": "1",
        "status": "ok",
        "hubid": hubid,
    })
}

pub(crate) fn control_json(uid: &str) -> Value {
    json!({
        "uid": uid,
        "mode": "TH",
        "sequence": "0",
        "speed": "3",
        "duration": "1",
        "started": "0",
        "remaining": "0",
        "source": "LOCAL",
        "input_1_value": "0",
    })
}

impl StubHub {
    pub fn new() -> Self {
        Self {
            uids: Vec::new(),
            replies: Mutex::new(HashMap::new()),
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Register a well-behaved fan and list it under `uids`
    pub fn with_fan(mut self, uid: &str, hubid: &str) -> Self {
        self.uids.push(uid.to_string());
        self.with_reply(&format!("device/{}", uid), Reply::Json(device_json(uid, hubid)))
            .with_reply(&format!("control/{}", uid), Reply::Json(control_json(uid)))
    }

    /// Override the reply for one resource path
    pub fn with_reply(self, path: &str, reply: Reply) -> Self {
        self.replies
            .lock()
            .unwrap()
            .insert(path.to_string(), reply);
        self
    }

    pub fn sent(&self) -> Vec<SentRequest> {
        self.sent.lock().unwrap().clone()
    }

    fn reply_for(&self, path: &str) -> Option<Reply> {
        if let Some(reply) = self.replies.lock().unwrap().get(path) {
            return Some(reply.clone());
        }
        if path == "uids" {
            let list: Vec<Value> = self.uids.iter().map(|uid| json!({ "uid": uid })).collect();
            return Some(Reply::Json(Value::Array(list)));
        }
        None
    }

    /// PUT merges the payload into the stored control state and echoes it back
    fn apply_put(&self, path: &str, payload: &Value) -> Option<Reply> {
        let mut replies = self.replies.lock().unwrap();
        match replies.get_mut(path) {
            Some(Reply::Json(Value::Object(state))) => {
                if let Value::Object(update) = payload {
                    for (key, value) in update {
                        state.insert(key.clone(), value.clone());
                    }
                }
                Some(Reply::Json(Value::Object(state.clone())))
            }
            Some(other) => Some(other.clone()),
            None => None,
        }
    }
}

#[async_trait]
impl CoapTransport for StubHub {
    async fn send(
        &self,
        hub_address: &str,
        method: Method,
        path: &str,
        payload: Option<&[u8]>,
    ) -> Result<Vec<u8>> {
        let payload = payload.map(|p| serde_json::from_slice::<Value>(p).unwrap());
        self.sent.lock().unwrap().push(SentRequest {
            hub_address: hub_address.to_string(),
            method,
            path: path.to_string(),
            payload: payload.clone(),
        });

        let reply = match (method, &payload) {
            (Method::Put, Some(body)) => self.apply_put(path, body),
            _ => self.reply_for(path),
        };

        match reply {
            Some(Reply::Json(value)) => Ok(serde_json::to_vec(&value).unwrap()),
            Some(Reply::Raw(bytes)) => Ok(bytes),
            Some(Reply::Delayed(delay, value)) => {
                tokio::time::sleep(delay).await;
                Ok(serde_json::to_vec(&value).unwrap())
            }
            Some(Reply::Unreachable) => Err(QuietcoolError::CommunicationFailure(format!(
                "No response from {} for {} {}",
                hub_address, method, path
            ))),
            Some(Reply::Hang) => std::future::pending().await,
            None => Err(QuietcoolError::InvalidResponse(format!(
                "Hub answered 4.04 for {}",
                path
            ))),
        }
    }
}
