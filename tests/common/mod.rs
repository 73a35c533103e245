//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hcloud_entries::clients::{HttpError, HttpRequest, HttpResponse, HttpResponseError, Transport};
use hcloud_entries::Client;
use serde_json::Value;

/// In-memory transport that replays queued responses and records every
/// request it receives.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Queues a response. Non-2xx codes are returned as `HttpError::Response`.
    pub fn respond(&self, code: u16, body: Value) -> &Self {
        self.respond_with_headers(code, body, &[])
    }

    pub fn respond_with_headers(&self, code: u16, body: Value, headers: &[(&str, &str)]) -> &Self {
        let headers: HashMap<String, Vec<String>> = headers
            .iter()
            .map(|(k, v)| (k.to_lowercase(), vec![(*v).to_string()]))
            .collect();
        self.responses
            .lock()
            .unwrap()
            .push_back(HttpResponse::new(code, headers, body));
        self
    }

    /// Returns a copy of all requests sent so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Returns the most recent request.
    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;
        self.requests.lock().unwrap().push(request);

        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected request: no response queued");

        if response.is_ok() {
            Ok(response)
        } else {
            Err(HttpError::Response(HttpResponseError {
                code: response.code,
                message: response.error_message(),
                error_code: response.error_code().map(String::from),
                details: response.error_details().cloned(),
                error_reference: response.request_id().map(String::from),
            }))
        }
    }
}

/// Creates a client backed by `transport`.
pub fn client(transport: &Arc<MockTransport>) -> Client {
    Client::with_transport(Arc::clone(transport) as Arc<dyn Transport>)
}
