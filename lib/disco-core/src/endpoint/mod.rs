//! Generated endpoints.
//!
//! An [`EndpointType`] captures one discovery document. Instantiating it walks
//! the document and produces an [`Endpoint`]: a read-only tree of
//! [`Resource`]s whose leaves are callable [`Method`]s.

use std::sync::Arc;

use crate::client::{ClientHandle, DiscoveryClient};
use crate::request::{Params, RequestExecutor};
use crate::schema::DiscoveryDocument;

mod method;
pub use self::method::Method;

mod resource;
pub use self::resource::Resource;

mod url;
pub use self::url::{build_url, trim_delimiters};

/// Construction options of an endpoint instance.
///
/// Free-form, like the options object of a generated client. The executor reads
/// the `params` entry, when it is an object, as default call parameters.
#[derive(Debug, Clone, Default, PartialEq, derive_more::Deref, derive_more::From)]
pub struct EndpointOptions(Params);

impl EndpointOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces one option.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Default parameters merged into every call.
    pub fn default_params(&self) -> Option<&Params> {
        self.0.get("params").and_then(serde_json::Value::as_object)
    }
}

/// State shared by every method of one endpoint instance.
///
/// The client reference is a lookup-only back-pointer to the discovery client
/// that produced the endpoint; it never keeps the client alive.
#[derive(derive_more::Debug)]
pub struct EndpointContext {
    options: EndpointOptions,
    #[debug(skip)]
    executor: Arc<dyn RequestExecutor>,
    #[debug(skip)]
    client: Option<ClientHandle>,
}

impl EndpointContext {
    pub(crate) fn new(
        options: EndpointOptions,
        executor: Arc<dyn RequestExecutor>,
        client: Option<ClientHandle>,
    ) -> Self {
        Self {
            options,
            executor,
            client,
        }
    }

    /// The options the endpoint was built with.
    pub fn options(&self) -> &EndpointOptions {
        &self.options
    }

    /// The executor used by every method of the endpoint.
    pub fn executor(&self) -> &Arc<dyn RequestExecutor> {
        &self.executor
    }

    /// The discovery client that built the endpoint, if it is still alive.
    pub fn client(&self) -> Option<DiscoveryClient> {
        self.client.as_ref()?.upgrade()
    }
}

/// A constructible endpoint, bound to one discovery document.
#[derive(derive_more::Debug, Clone)]
pub struct EndpointType {
    schema: Arc<DiscoveryDocument>,
    #[debug(skip)]
    executor: Arc<dyn RequestExecutor>,
}

impl EndpointType {
    /// Captures `schema`; every instance calls through `executor`.
    pub fn new(schema: DiscoveryDocument, executor: Arc<dyn RequestExecutor>) -> Self {
        Self {
            schema: Arc::new(schema),
            executor,
        }
    }

    /// The captured discovery document.
    pub fn schema(&self) -> &DiscoveryDocument {
        &self.schema
    }

    /// Builds a fresh endpoint instance.
    pub fn instantiate(&self, options: impl Into<EndpointOptions>) -> Endpoint {
        self.build(options.into(), None)
    }

    pub(crate) fn instantiate_for(
        &self,
        options: EndpointOptions,
        client: ClientHandle,
    ) -> Endpoint {
        self.build(options, Some(client))
    }

    fn build(&self, options: EndpointOptions, client: Option<ClientHandle>) -> Endpoint {
        let context = Arc::new(EndpointContext::new(
            options,
            Arc::clone(&self.executor),
            client,
        ));

        let mut root = Resource::default();
        root.apply(&self.schema, &self.schema.schema, &context);

        Endpoint { context, root }
    }
}

/// An instantiated endpoint: the generated client tree plus its context.
///
/// Instances are immutable once built. Navigate with [`Resource::resource`],
/// [`Resource::method`] and [`Resource::lookup`], available through `Deref`.
#[derive(Debug, Clone, derive_more::Deref)]
pub struct Endpoint {
    context: Arc<EndpointContext>,
    #[deref]
    root: Resource,
}

impl Endpoint {
    /// The options this instance was built with.
    pub fn options(&self) -> &EndpointOptions {
        self.context.options()
    }

    /// The context shared by every method of this instance.
    pub fn context(&self) -> &Arc<EndpointContext> {
        &self.context
    }

    /// The discovery client that built this instance, if any and still alive.
    pub fn client(&self) -> Option<DiscoveryClient> {
        self.context.client()
    }
}
