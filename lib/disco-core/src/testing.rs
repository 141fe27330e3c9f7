//! Test doubles for the transport and executor seams.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use indexmap::IndexMap;
use reqwest::{Request, Response};
use serde_json::Value;
use url::Url;

use crate::request::{ApiResponse, RequestDescriptor, RequestExecutor};
use crate::{BoxFuture, DiscoveryError, Transport};

#[derive(Debug, Clone)]
struct MockRoute {
    status: u16,
    body: String,
    delay: Option<Duration>,
}

/// A request as seen by [`MockTransport`].
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub(crate) method: String,
    pub(crate) url: String,
    pub(crate) headers: http::HeaderMap,
    pub(crate) body: Vec<u8>,
}

/// In-memory transport answering from routes keyed by URL (query excluded).
///
/// Unknown URLs answer `404`. Clones share routes and recorded requests.
#[derive(Debug, Clone, Default)]
pub(crate) struct MockTransport {
    routes: Arc<Mutex<IndexMap<String, MockRoute>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

fn route_key(url: &Url) -> String {
    let mut url = url.clone();
    url.set_query(None);
    url.to_string()
}

impl MockTransport {
    pub(crate) fn with_route(self, url: &str, status: u16, body: impl Into<String>) -> Self {
        let url = Url::parse(url).expect("a valid route URL");
        self.routes.lock().expect("routes lock").insert(
            route_key(&url),
            MockRoute {
                status,
                body: body.into(),
                delay: None,
            },
        );
        self
    }

    pub(crate) fn with_json(self, url: &str, body: Value) -> Self {
        self.with_route(url, 200, body.to_string())
    }

    pub(crate) fn with_delay(self, url: &str, delay: Duration) -> Self {
        let url = Url::parse(url).expect("a valid route URL");
        if let Some(route) = self
            .routes
            .lock()
            .expect("routes lock")
            .get_mut(&route_key(&url))
        {
            route.delay = Some(delay);
        }
        self
    }

    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("requests lock").clone()
    }
}

impl Transport for MockTransport {
    fn execute(&self, request: Request) -> BoxFuture<'_, Result<Response, DiscoveryError>> {
        let route = self
            .routes
            .lock()
            .expect("routes lock")
            .get(&route_key(request.url()))
            .cloned();

        self.requests
            .lock()
            .expect("requests lock")
            .push(RecordedRequest {
                method: request.method().to_string(),
                url: request.url().to_string(),
                headers: request.headers().clone(),
                body: request
                    .body()
                    .and_then(reqwest::Body::as_bytes)
                    .map(<[u8]>::to_vec)
                    .unwrap_or_default(),
            });

        Box::pin(async move {
            let MockRoute {
                status,
                body,
                delay,
            } = route.unwrap_or_else(|| MockRoute {
                status: 404,
                body: "not found".to_string(),
                delay: None,
            });
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let response = http::Response::builder().status(status).body(body)?;
            Ok(Response::from(response))
        })
    }
}

/// Executor recording every descriptor and answering `200` with a `null` body.
#[derive(Debug, Clone, Default)]
pub(crate) struct RecordingExecutor {
    calls: Arc<Mutex<Vec<RequestDescriptor>>>,
}

impl RecordingExecutor {
    pub(crate) fn calls(&self) -> Vec<RequestDescriptor> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl RequestExecutor for RecordingExecutor {
    fn execute(
        &self,
        descriptor: RequestDescriptor,
    ) -> BoxFuture<'_, Result<ApiResponse, DiscoveryError>> {
        self.calls.lock().expect("calls lock").push(descriptor);
        Box::pin(async {
            Ok(ApiResponse {
                status: 200,
                body: Value::Null,
            })
        })
    }
}
