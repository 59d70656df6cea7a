//! Shared helpers: a transport that records requests and replays canned responses.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use txnpay::{
    Credentials, GatewayClient, GatewayConfig, GatewayError, HttpResponse, HttpTransport,
    RequestBody, Result,
};

// usable keys from the gateway's developer guide
pub const SECRET_KEY: &str = "cxl+hwc%97h6+4#lx1au*ut=ml+=!fx85w94iuf*06=rf383xs";
pub const API_KEY: &str = "7)5dmcfy^dp*9bdrcfcm$k-n=p7b!x(t)_f^i8mxl@v_+rno*x";

pub const BASE_URL: &str = "http://gateway.test";

/// A request as seen by the transport.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<RequestBody>,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Default)]
pub struct RecordingTransport {
    responses: Mutex<VecDeque<HttpResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(RecordingTransport::default())
    }

    /// Queues a response resolved at the gateway base URL.
    pub fn respond(&self, status: u16, body: &str) {
        self.respond_from(status, BASE_URL, body);
    }

    /// Queues a response with an explicit resolved URL.
    pub fn respond_from(&self, status: u16, url: &str, body: &str) {
        self.responses
            .lock()
            .unwrap()
            .push_back(HttpResponse::new(status, url, body));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, request: RecordedRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| GatewayError::Transport("no response queued".to_string()))
    }
}

impl HttpTransport for RecordingTransport {
    fn get(&self, url: &str, headers: &[(String, String)]) -> Result<HttpResponse> {
        self.record(RecordedRequest {
            method: "GET",
            url: url.to_string(),
            headers: headers.to_vec(),
            body: None,
        })
    }

    fn post(
        &self,
        url: &str,
        body: RequestBody,
        headers: &[(String, String)],
    ) -> Result<HttpResponse> {
        self.record(RecordedRequest {
            method: "POST",
            url: url.to_string(),
            headers: headers.to_vec(),
            body: Some(body),
        })
    }
}

pub fn authenticated(transport: &Arc<RecordingTransport>) -> GatewayClient {
    let credentials = Credentials::new(Some(SECRET_KEY), Some(API_KEY)).unwrap();
    GatewayClient::with_transport(credentials, GatewayConfig::new(BASE_URL), transport.clone())
}

pub fn unauthenticated(transport: &Arc<RecordingTransport>) -> GatewayClient {
    GatewayClient::unauthenticated(GatewayConfig::new(BASE_URL), transport.clone())
}
