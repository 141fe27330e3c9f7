//! Request descriptors and their execution.
//!
//! A generated method never talks to the network itself: it assembles a
//! [`RequestDescriptor`] and hands it to a [`RequestExecutor`]. The default
//! executor, [`HttpRequestExecutor`], turns descriptors into HTTP calls over a
//! [`Transport`](crate::Transport).

use std::sync::Arc;

use crate::endpoint::EndpointContext;
use crate::{BoxFuture, DiscoveryError};

mod body;
mod executor;
mod path;

pub use self::executor::HttpRequestExecutor;

/// Caller-supplied parameters of one call, keyed by parameter name.
pub type Params = serde_json::Map<String, serde_json::Value>;

/// The fully described, not yet executed, HTTP call.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    /// URL template, `{name}` placeholders still present
    pub url: String,
    /// HTTP verb as declared by the method
    pub http_method: String,
    /// Parameters supplied to this call
    pub params: Params,
    /// Parameters the call cannot be made without
    pub required_params: Vec<String>,
    /// Parameters substituted into the URL template
    pub path_params: Vec<String>,
    /// Endpoint state shared by every method of one instance
    pub context: Arc<EndpointContext>,
    /// URL template used instead of `url` when uploading media
    pub media_url: Option<String>,
}

/// Result of a successful call.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Decoded body: JSON when parseable, a string otherwise, `Null` when empty
    pub body: serde_json::Value,
}

/// Executes request descriptors.
///
/// This is the seam between generated endpoints and the wire. Implementations
/// own retries, authentication and timeouts; generated methods return whatever
/// the executor produces without wrapping it.
pub trait RequestExecutor: std::fmt::Debug + Send + Sync {
    /// Executes one call.
    fn execute(
        &self,
        descriptor: RequestDescriptor,
    ) -> BoxFuture<'_, Result<ApiResponse, DiscoveryError>>;
}
