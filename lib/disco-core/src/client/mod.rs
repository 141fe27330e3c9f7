//! Discovery client: fetches discovery documents and builds endpoints from them.

use std::sync::{Arc, Weak};

use http::{HeaderName, HeaderValue};
use reqwest::Request;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};
use url::Url;

use crate::endpoint::{EndpointContext, EndpointOptions, EndpointType};
use crate::request::{Params, RequestDescriptor, RequestExecutor};
use crate::schema::{DirectoryList, DiscoveryDocument};

mod builder;
pub use self::builder::DiscoveryClientBuilder;

mod error;
pub use self::error::DiscoveryError;

mod registry;
pub use self::registry::{ApiRegistry, ApiVersions, SelectorArg};

mod source;
pub use self::source::DiscoverySource;

mod transport;
pub(crate) use self::transport::success_text;
pub use self::transport::{BoxFuture, Transport};


/// The public Google APIs discovery directory.
pub const GOOGLE_DISCOVERY_DIRECTORY: &str = "https://www.googleapis.com/discovery/v1/apis";

/// Header sent with directory requests to hide private APIs.
const USER_IP_HEADER: HeaderName = HeaderName::from_static("x-user-ip");

/// Discovers APIs and builds callable endpoints from their discovery documents.
///
/// The client is cheap to clone; every clone shares the same transport and
/// executor. Endpoints built through an [`ApiRegistry`] keep a weak reference
/// to it, reachable with [`Endpoint::client`](crate::Endpoint::client).
///
/// # Example
///
/// ```rust,no_run
/// use disco_core::{DiscoveryClient, Params};
///
/// # async fn example() -> Result<(), disco_core::DiscoveryError> {
/// let client = DiscoveryClient::default();
///
/// let drive = client
///     .discover_api("https://www.googleapis.com/discovery/v1/apis/drive/v3/rest")
///     .await?
///     .instantiate(Params::new());
///
/// if let Some(list) = drive.lookup("files.list") {
///     let response = list.call(Params::new()).await?;
///     println!("{}", response.body);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct DiscoveryClient {
    inner: Arc<ClientInner>,
}

#[derive(Debug)]
pub(crate) struct ClientInner {
    include_private: bool,
    debug: bool,
    transport: Arc<dyn Transport>,
    executor: Arc<dyn RequestExecutor>,
}

/// Lookup-only reference to a discovery client.
#[derive(Debug, Clone)]
pub(crate) struct ClientHandle(Weak<ClientInner>);

impl ClientHandle {
    pub(crate) fn upgrade(&self) -> Option<DiscoveryClient> {
        self.0.upgrade().map(|inner| DiscoveryClient { inner })
    }
}

impl Default for DiscoveryClient {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl DiscoveryClient {
    /// Creates a client with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder to configure the client.
    pub fn builder() -> DiscoveryClientBuilder {
        DiscoveryClientBuilder::default()
    }

    /// Whether private APIs are listed by [`Self::discover_all_apis`].
    pub fn include_private(&self) -> bool {
        self.inner.include_private
    }

    /// Whether document fetches are logged at `info` level.
    pub fn debug(&self) -> bool {
        self.inner.debug
    }

    /// The transport used to fetch documents.
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.inner.transport
    }

    /// The executor shared by every endpoint this client builds.
    pub fn executor(&self) -> &Arc<dyn RequestExecutor> {
        &self.inner.executor
    }

    pub(crate) fn handle(&self) -> ClientHandle {
        ClientHandle(Arc::downgrade(&self.inner))
    }

    /// Loads one discovery document and returns its endpoint type.
    ///
    /// The source is a file path, a URL, an options object (a `url` entry plus
    /// query parameters, see [`DiscoverySource`]) or an already parsed document.
    ///
    /// Text documents are parsed with `serde_json`'s default recursion limit of
    /// 128 nested values, which allows about 62 levels of nested `resources`.
    ///
    /// # Errors
    ///
    /// - [`DiscoveryError::ReadDocument`] when a file cannot be read
    /// - [`DiscoveryError::UnexpectedStatusCode`] when the server answers with a non-2xx status
    /// - [`DiscoveryError::ParseDocument`] when the content is not a discovery document,
    ///   or nests deeper than the recursion limit
    /// - transport failures
    pub async fn discover_api(
        &self,
        source: impl Into<DiscoverySource>,
    ) -> Result<EndpointType, DiscoveryError> {
        let source = source.into();
        let source_name = source.name();
        self.log_fetch("discovering API", &source_name);

        let document = match source {
            DiscoverySource::Path(path) => {
                let text = tokio::fs::read_to_string(&path).await.map_err(|error| {
                    DiscoveryError::ReadDocument {
                        path: path.display().to_string(),
                        error,
                    }
                })?;
                parse_document(&source_name, &text)?
            }
            DiscoverySource::Url(url) => {
                let text = self.fetch(url, false).await?;
                parse_document(&source_name, &text)?
            }
            DiscoverySource::Request { url, params } => {
                self.fetch_with_executor(&source_name, url, params).await?
            }
            DiscoverySource::Document(document) => *document,
        };

        debug!(
            name = ?document.name,
            version = ?document.version,
            "discovery document loaded"
        );
        Ok(EndpointType::new(document, Arc::clone(self.executor())))
    }

    /// Lists a discovery directory and discovers every API in it, concurrently.
    ///
    /// The registry groups the resulting endpoint types by name then version.
    /// The first failure aborts the discoveries still in flight and is
    /// returned; no partial registry is produced.
    ///
    /// # Errors
    ///
    /// - [`DiscoveryError::UrlError`] when `directory_url` is not a URL
    /// - any error of [`Self::discover_api`], for the directory or one of its entries
    pub async fn discover_all_apis(
        &self,
        directory_url: &str,
    ) -> Result<ApiRegistry, DiscoveryError> {
        let url = Url::parse(directory_url)?;
        self.log_fetch("listing APIs", directory_url);

        let text = self.fetch(url, !self.include_private()).await?;
        let directory: DirectoryList = serde_json::from_str(&text).map_err(|error| {
            DiscoveryError::ParseDocument {
                source_name: directory_url.to_string(),
                error,
            }
        })?;
        debug!(count = directory.items.len(), "directory listed");

        let mut tasks = JoinSet::new();
        for (index, entry) in directory.items.iter().enumerate() {
            let client = self.clone();
            let source = DiscoverySource::from(entry.discovery_rest_url.as_str());
            tasks.spawn(async move { (index, client.discover_api(source).await) });
        }

        let mut discovered = vec![None; directory.items.len()];
        while let Some(joined) = tasks.join_next().await {
            let (index, result) = match joined {
                Ok(joined) => joined,
                Err(error) => {
                    tasks.abort_all();
                    return Err(DiscoveryError::TaskJoinError(error));
                }
            };
            match result {
                Ok(endpoint_type) => {
                    if let Some(slot) = discovered.get_mut(index) {
                        *slot = Some(endpoint_type);
                    }
                }
                Err(error) => {
                    if let Some(entry) = directory.items.get(index) {
                        warn!(
                            name = %entry.name,
                            version = %entry.version,
                            %error,
                            "discovery failed"
                        );
                    }
                    tasks.abort_all();
                    return Err(error);
                }
            }
        }

        let handle = self.handle();
        let mut registry = ApiRegistry::default();
        for (entry, endpoint_type) in directory.items.iter().zip(discovered) {
            if let Some(endpoint_type) = endpoint_type {
                registry.insert(entry, endpoint_type, &handle);
            }
        }

        Ok(registry)
    }

    /// GETs `url`, returning the body of a 2xx response.
    async fn fetch(&self, url: Url, hide_private: bool) -> Result<String, DiscoveryError> {
        let mut request = Request::new(http::Method::GET, url);
        if hide_private {
            request
                .headers_mut()
                .insert(USER_IP_HEADER, HeaderValue::from_static("0.0.0.0"));
        }

        let response = self.transport().execute(request).await?;
        success_text(response).await
    }

    /// Fetches a document through the request executor, with `params` as the query.
    async fn fetch_with_executor(
        &self,
        source_name: &str,
        url: Url,
        params: Params,
    ) -> Result<DiscoveryDocument, DiscoveryError> {
        let context = Arc::new(EndpointContext::new(
            EndpointOptions::default(),
            Arc::clone(self.executor()),
            None,
        ));
        let descriptor = RequestDescriptor {
            url: url.to_string(),
            http_method: http::Method::GET.to_string(),
            params,
            required_params: vec![],
            path_params: vec![],
            context,
            media_url: None,
        };

        let response = self.executor().execute(descriptor).await?;
        serde_json::from_value(response.body).map_err(|error| DiscoveryError::ParseDocument {
            source_name: source_name.to_string(),
            error,
        })
    }

    fn log_fetch(&self, message: &str, location: &str) {
        if self.debug() {
            info!(%location, "{message}");
        } else {
            debug!(%location, "{message}");
        }
    }
}

fn parse_document(source_name: &str, text: &str) -> Result<DiscoveryDocument, DiscoveryError> {
    serde_json::from_str(text).map_err(|error| DiscoveryError::ParseDocument {
        source_name: source_name.to_string(),
        error,
    })
}
