use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;

use reqwest::{Request, Response};

use super::DiscoveryError;

/// Boxed future returned by the transport and executor seams.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Maximum number of response body bytes kept in error messages.
pub(crate) const BODY_MAX_LENGTH: usize = 1024;

/// Sends HTTP requests on behalf of the discovery client and generated methods.
///
/// A single transport is shared by every concurrent discovery and every endpoint
/// built from it, so implementations must not keep per-call mutable state.
/// [`reqwest::Client`] implements this trait.
pub trait Transport: Debug + Send + Sync {
    /// Executes one request.
    fn execute(&self, request: Request) -> BoxFuture<'_, Result<Response, DiscoveryError>>;
}

impl Transport for reqwest::Client {
    fn execute(&self, request: Request) -> BoxFuture<'_, Result<Response, DiscoveryError>> {
        Box::pin(async move { Ok(reqwest::Client::execute(self, request).await?) })
    }
}

/// Reads the body of a successful response, failing on any non-2xx status.
pub(crate) async fn success_text(response: Response) -> Result<String, DiscoveryError> {
    let status_code = response.status().as_u16();
    if response.status().is_success() {
        return Ok(response.text().await?);
    }

    let body = response
        .text()
        .await
        .map(truncate_body)
        .unwrap_or_else(|err| format!("<unable to read response body: {err}>"));
    Err(DiscoveryError::UnexpectedStatusCode { status_code, body })
}

fn truncate_body(text: String) -> String {
    if text.len() <= BODY_MAX_LENGTH {
        return text;
    }
    let mut end = BODY_MAX_LENGTH;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated)", &text[..end])
}
