//! # Disco Core
//!
//! Build callable HTTP API clients at runtime from discovery documents.
//!
//! A discovery document describes an API as a tree of resources and methods.
//! This crate fetches such documents and turns each one into an
//! [`EndpointType`]; instantiating it produces an [`Endpoint`], a tree of
//! [`Resource`]s whose leaves are callable [`Method`]s.
//!
//! ## Quick Start
//!
//! ### One API
//!
//! ```rust,no_run
//! use disco_core::{DiscoveryClient, EndpointOptions, Params};
//! use serde_json::json;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DiscoveryClient::new();
//!
//! let drive = client
//!     .discover_api("https://www.googleapis.com/discovery/v1/apis/drive/v3/rest")
//!     .await?
//!     .instantiate(EndpointOptions::new().with("params", json!({"key": "API_KEY"})));
//!
//! let mut params = Params::new();
//! params.insert("fileId".to_string(), json!("1a2b3c"));
//! let file = drive.lookup("files.get").expect("files.get").call(params).await?;
//! println!("{}", file.body);
//! # Ok(())
//! # }
//! ```
//!
//! ### Every API of a directory
//!
//! ```rust,no_run
//! use disco_core::{DiscoveryClient, GOOGLE_DISCOVERY_DIRECTORY};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = DiscoveryClient::new();
//! let registry = client.discover_all_apis(GOOGLE_DISCOVERY_DIRECTORY).await?;
//!
//! // A version string, or options carrying a `version` entry
//! let drive = registry.select("drive", "v3")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Execution
//!
//! Generated methods never touch the network themselves: they build a
//! [`RequestDescriptor`] and hand it to the [`RequestExecutor`] configured on
//! the client. The default [`HttpRequestExecutor`] sends it over the client's
//! [`Transport`]; plug your own executor with
//! [`DiscoveryClientBuilder::with_executor`] for authentication, retries or
//! recording.

mod client;
mod endpoint;
mod request;
mod schema;

#[cfg(test)]
mod testing;

pub use self::client::{
    ApiRegistry, ApiVersions, BoxFuture, DiscoveryClient, DiscoveryClientBuilder, DiscoveryError,
    DiscoverySource, GOOGLE_DISCOVERY_DIRECTORY, SelectorArg, Transport,
};
pub use self::endpoint::{
    Endpoint, EndpointContext, EndpointOptions, EndpointType, Method, Resource, build_url,
    trim_delimiters,
};
pub use self::request::{
    ApiResponse, HttpRequestExecutor, Params, RequestDescriptor, RequestExecutor,
};
pub use self::schema::{
    DirectoryEntry, DirectoryList, DiscoveryDocument, MediaUpload, MediaUploadProtocols,
    MethodSchema, ParameterSchema, ResourceSchema, UploadProtocol, extract_path_params,
};
