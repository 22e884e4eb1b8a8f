//! Best-effort delivery of flows to the ALE integration-flow endpoint.
//!
//! Network failures are never errors here: every call resolves to a
//! [`Delivery`] which the caller reports and moves on from.

use std::time::Duration;

use ale_core::error::{AleError, Result};
use ale_core::models::FlowRecord;
use reqwest::Url;
use tracing::{debug, warn};

// ── Transport seam ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
    Delete,
}

/// A single outgoing request with an optional JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Unsigned integer field of a JSON object body, if present.
    pub fn json_u64(&self, key: &str) -> Option<u64> {
        serde_json::from_str::<serde_json::Value>(&self.body)
            .ok()?
            .get(key)?
            .as_u64()
    }
}

/// Performs one HTTP exchange. `Err` means no response was obtained.
pub trait HttpTransport {
    fn perform(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Blocking `reqwest` transport with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AleError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

impl HttpTransport for ReqwestTransport {
    fn perform(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let builder = match request.method {
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Delete => self.client.delete(&request.url),
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder
            .send()
            .map_err(|e| AleError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response.text().unwrap_or_default();
        Ok(HttpResponse { status, body })
    }
}

// ── Delivery ──────────────────────────────────────────────────────────────────

/// How a best-effort call ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    /// The endpoint answered with a 2xx status.
    Accepted(HttpResponse),
    /// The endpoint answered with any other status.
    Rejected(HttpResponse),
    /// No response: connection refused, timeout, DNS failure...
    Unreachable(String),
}

impl Delivery {
    fn from_result(result: Result<HttpResponse>) -> Self {
        match result {
            Ok(resp) if resp.is_success() => Delivery::Accepted(resp),
            Ok(resp) => {
                warn!("ALE endpoint answered {}", resp.status);
                Delivery::Rejected(resp)
            }
            Err(AleError::Transport(msg)) => {
                warn!("ALE endpoint unreachable: {}", msg);
                Delivery::Unreachable(msg)
            }
            Err(other) => {
                warn!("ALE request failed: {}", other);
                Delivery::Unreachable(other.to_string())
            }
        }
    }
}

// ── AleClient ─────────────────────────────────────────────────────────────────

/// Client for the integration-flow collection of an ALE server.
#[derive(Debug, Clone)]
pub struct AleClient<T = ReqwestTransport> {
    endpoint: Url,
    transport: T,
}

impl AleClient<ReqwestTransport> {
    /// Client over the blocking `reqwest` transport.
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self> {
        Self::with_transport(endpoint, ReqwestTransport::new(timeout)?)
    }
}

impl<T: HttpTransport> AleClient<T> {
    /// Client over a caller-supplied transport. Fails when `endpoint` is not
    /// an absolute URL.
    pub fn with_transport(endpoint: &str, transport: T) -> Result<Self> {
        let endpoint = Url::parse(endpoint).map_err(|e| AleError::InvalidEndpoint {
            url: endpoint.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            endpoint,
            transport,
        })
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// POST the full flow list as one JSON array.
    pub fn push_flows(&self, flows: &[FlowRecord]) -> Delivery {
        let body = match serde_json::to_value(flows) {
            Ok(b) => b,
            Err(e) => return Delivery::Unreachable(e.to_string()),
        };
        debug!("POST {} flows to {}", flows.len(), self.endpoint);
        Delivery::from_result(self.transport.perform(&HttpRequest {
            method: HttpMethod::Post,
            url: self.endpoint.to_string(),
            body: Some(body),
        }))
    }

    /// DELETE every flow whose `source` equals `source`.
    pub fn delete_by_source(&self, source: &str) -> Delivery {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("source", source);
        debug!("DELETE {}", url);
        Delivery::from_result(self.transport.perform(&HttpRequest {
            method: HttpMethod::Delete,
            url: url.to_string(),
            body: None,
        }))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Transport that records requests and replays a canned outcome.
    #[derive(Debug)]
    pub(crate) struct FakeTransport {
        pub requests: RefCell<Vec<HttpRequest>>,
        outcome: std::result::Result<(u16, String), String>,
    }

    impl FakeTransport {
        pub fn responding(status: u16, body: &str) -> Self {
            Self {
                requests: RefCell::new(Vec::new()),
                outcome: Ok((status, body.to_string())),
            }
        }

        pub fn unreachable(msg: &str) -> Self {
            Self {
                requests: RefCell::new(Vec::new()),
                outcome: Err(msg.to_string()),
            }
        }
    }

    impl HttpTransport for FakeTransport {
        fn perform(&self, request: &HttpRequest) -> Result<HttpResponse> {
            self.requests.borrow_mut().push(request.clone());
            match &self.outcome {
                Ok((status, body)) => Ok(HttpResponse {
                    status: *status,
                    body: body.clone(),
                }),
                Err(msg) => Err(AleError::Transport(msg.clone())),
            }
        }
    }

    const ENDPOINT: &str = "http://localhost:3000/api/ale/integration-flows";

    #[test]
    fn test_fake_transport_client_is_debug() {
        let client =
            AleClient::with_transport(ENDPOINT, FakeTransport::responding(200, "")).unwrap();
        assert!(format!("{:?}", client).contains("FakeTransport"));
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let err = AleClient::with_transport("not a url", FakeTransport::responding(200, ""))
            .unwrap_err();
        assert!(matches!(err, AleError::InvalidEndpoint { .. }));
    }

    #[test]
    fn test_push_flows_posts_json_array() {
        let client =
            AleClient::with_transport(ENDPOINT, FakeTransport::responding(200, "{}")).unwrap();

        let delivery = client.push_flows(&[]);

        assert!(matches!(delivery, Delivery::Accepted(_)));
        let requests = client.transport.requests.borrow();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, HttpMethod::Post);
        assert_eq!(requests[0].url, ENDPOINT);
        assert_eq!(requests[0].body, Some(serde_json::json!([])));
    }

    #[test]
    fn test_delete_by_source_adds_query() {
        let client = AleClient::with_transport(
            ENDPOINT,
            FakeTransport::responding(200, r#"{"success":true,"removed":3,"remaining":0}"#),
        )
        .unwrap();

        let delivery = client.delete_by_source("datadog");

        let requests = client.transport.requests.borrow();
        assert_eq!(requests[0].method, HttpMethod::Delete);
        assert_eq!(requests[0].url, format!("{}?source=datadog", ENDPOINT));
        assert!(requests[0].body.is_none());
        match delivery {
            Delivery::Accepted(resp) => assert_eq!(resp.json_u64("removed"), Some(3)),
            other => panic!("expected Accepted, got {:?}", other),
        }
    }

    #[test]
    fn test_non_success_status_is_rejected() {
        let client = AleClient::with_transport(
            ENDPOINT,
            FakeTransport::responding(400, r#"{"error":"No valid integration flows supplied"}"#),
        )
        .unwrap();

        match client.push_flows(&[]) {
            Delivery::Rejected(resp) => {
                assert_eq!(resp.status, 400);
                assert!(resp.body.contains("No valid"));
            }
            other => panic!("expected Rejected, got {:?}", other),
        }
    }

    #[test]
    fn test_transport_failure_is_unreachable() {
        let client = AleClient::with_transport(
            ENDPOINT,
            FakeTransport::unreachable("connection refused"),
        )
        .unwrap();

        assert_eq!(
            client.delete_by_source("datadog"),
            Delivery::Unreachable("connection refused".to_string())
        );
    }

    #[test]
    fn test_response_success_range() {
        let ok = HttpResponse { status: 201, body: String::new() };
        let redirect = HttpResponse { status: 302, body: String::new() };
        assert!(ok.is_success());
        assert!(!redirect.is_success());
    }

    #[test]
    fn test_json_u64_tolerates_non_json() {
        let resp = HttpResponse { status: 200, body: "OK".to_string() };
        assert_eq!(resp.json_u64("total"), None);
    }

    #[test]
    fn test_reqwest_transport_reports_refused_connection() {
        // Port 9 (discard) on loopback is essentially never listening.
        let client = AleClient::new("http://127.0.0.1:9/flows", Duration::from_secs(2)).unwrap();
        assert!(matches!(
            client.delete_by_source("datadog"),
            Delivery::Unreachable(_)
        ));
    }
}
