use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;

use fruitopia_contracts::vision::ImageUpload;
use serde_json::Value;

use crate::transport::{Body, FetchError, Transport};

#[derive(Debug, Clone)]
pub(crate) enum Scripted {
    Json(Value),
    Raw(&'static str),
    Bytes(Vec<u8>),
    Status(u16),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Recorded {
    pub method: &'static str,
    pub url: String,
    pub payload: Option<Value>,
}

/// In-memory transport: url -> canned response, every request recorded in
/// order. Unknown urls answer 404.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    routes: Mutex<HashMap<String, Scripted>>,
    gates: Mutex<HashMap<String, Receiver<()>>>,
    requests: Mutex<Vec<Recorded>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(self, url: &str, response: Scripted) -> Self {
        self.routes
            .lock()
            .expect("routes lock")
            .insert(url.to_string(), response);
        self
    }

    /// The next request to `url` blocks until the returned sender fires.
    pub fn hold(&self, url: &str) -> Sender<()> {
        let (tx, rx) = mpsc::channel();
        self.gates
            .lock()
            .expect("gates lock")
            .insert(url.to_string(), rx);
        tx
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn urls(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|request| request.url)
            .collect()
    }

    fn respond(
        &self,
        method: &'static str,
        url: &str,
        payload: Option<Value>,
    ) -> Result<Body, FetchError> {
        self.requests.lock().expect("requests lock").push(Recorded {
            method,
            url: url.to_string(),
            payload,
        });
        let gate = self.gates.lock().expect("gates lock").remove(url);
        if let Some(gate) = gate {
            let _ = gate.recv();
        }
        let scripted = self.routes.lock().expect("routes lock").get(url).cloned();
        match scripted {
            Some(Scripted::Json(value)) => Ok(Body {
                bytes: serde_json::to_vec(&value)?,
                content_type: Some("application/json".to_string()),
            }),
            Some(Scripted::Raw(text)) => Ok(Body {
                bytes: text.as_bytes().to_vec(),
                content_type: Some("text/html".to_string()),
            }),
            Some(Scripted::Bytes(bytes)) => Ok(Body {
                bytes,
                content_type: Some("image/jpeg".to_string()),
            }),
            Some(Scripted::Status(status)) => Err(FetchError::Status {
                status,
                body: String::new(),
            }),
            None => Err(FetchError::Status {
                status: 404,
                body: "not found".to_string(),
            }),
        }
    }
}

impl Transport for ScriptedTransport {
    fn get(&self, url: &str) -> Result<Body, FetchError> {
        self.respond("GET", url, None)
    }

    fn post_json(&self, url: &str, payload: &Value) -> Result<Body, FetchError> {
        self.respond("POST", url, Some(payload.clone()))
    }

    fn post_file(
        &self,
        url: &str,
        field: &str,
        upload: &ImageUpload,
    ) -> Result<Body, FetchError> {
        let manifest = serde_json::json!({
            "field": field,
            "file_name": upload.file_name,
            "mime_type": upload.mime_type,
        });
        self.respond("POST", url, Some(manifest))
    }
}
