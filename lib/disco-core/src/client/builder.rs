use std::fmt::Debug;
use std::sync::Arc;

use super::{ClientInner, DiscoveryClient, Transport};
use crate::request::{HttpRequestExecutor, RequestExecutor};

/// Builder for creating `DiscoveryClient` instances.
///
/// # Default Configuration
///
/// - **Transport**: a fresh `reqwest::Client`
/// - **Executor**: [`HttpRequestExecutor`] over the transport
/// - **Private APIs**: excluded (the directory is fetched with `X-User-Ip: 0.0.0.0`)
/// - **Debug**: off (fetches are logged at `debug` level)
///
/// # Example
///
/// ```rust
/// use disco_core::DiscoveryClient;
///
/// let client = DiscoveryClient::builder()
///     .with_include_private(true)
///     .with_debug(true)
///     .build();
/// ```
#[derive(Debug, Clone, Default)]
pub struct DiscoveryClientBuilder {
    include_private: bool,
    debug: bool,
    transport: Option<Arc<dyn Transport>>,
    executor: Option<Arc<dyn RequestExecutor>>,
}

impl DiscoveryClientBuilder {
    /// Builds the client.
    ///
    /// Without an explicit executor, generated methods execute through an
    /// [`HttpRequestExecutor`] sharing the client's transport.
    pub fn build(self) -> DiscoveryClient {
        let Self {
            include_private,
            debug,
            transport,
            executor,
        } = self;

        let transport = transport.unwrap_or_else(|| Arc::new(reqwest::Client::new()));
        let executor = executor
            .unwrap_or_else(|| Arc::new(HttpRequestExecutor::new(Arc::clone(&transport))));

        DiscoveryClient {
            inner: Arc::new(ClientInner {
                include_private,
                debug,
                transport,
                executor,
            }),
        }
    }

    /// Includes private APIs when listing the discovery directory.
    ///
    /// When set, the directory request is sent without the `X-User-Ip` header.
    pub fn with_include_private(mut self, include_private: bool) -> Self {
        self.include_private = include_private;
        self
    }

    /// Logs every fetched document at `info` level instead of `debug`.
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Sets the transport used to fetch documents (and to execute calls, unless
    /// an executor is set).
    pub fn with_transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Sets the executor used by every generated method.
    pub fn with_executor(mut self, executor: impl RequestExecutor + 'static) -> Self {
        self.executor = Some(Arc::new(executor));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockTransport;

    #[test]
    fn test_default_builder() {
        let client = DiscoveryClient::builder().build();

        assert!(!client.include_private());
        assert!(!client.debug());
    }

    #[test]
    fn test_builder_flags() {
        let client = DiscoveryClient::builder()
            .with_include_private(true)
            .with_debug(true)
            .build();

        assert!(client.include_private());
        assert!(client.debug());
    }

    #[test]
    fn test_builder_with_transport() {
        let client = DiscoveryClient::builder()
            .with_transport(MockTransport::default())
            .build();

        assert!(format!("{:?}", client.transport()).starts_with("MockTransport"));
    }
}
