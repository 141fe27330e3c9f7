use indexmap::IndexMap;
use serde_json::Value;

use super::{ClientHandle, DiscoveryError};
use crate::endpoint::{Endpoint, EndpointOptions, EndpointType};
use crate::request::Params;
use crate::schema::DirectoryEntry;

/// Argument of a version selector.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectorArg {
    /// A version string, e.g. `"v3"`.
    Version(String),
    /// Construction options carrying a `version` entry.
    Options(Params),
    /// Anything else; always rejected.
    Other(Value),
}

impl From<&str> for SelectorArg {
    fn from(value: &str) -> Self {
        Self::Version(value.to_string())
    }
}

impl From<String> for SelectorArg {
    fn from(value: String) -> Self {
        Self::Version(value)
    }
}

impl From<Params> for SelectorArg {
    fn from(value: Params) -> Self {
        Self::Options(value)
    }
}

impl From<EndpointOptions> for SelectorArg {
    fn from(value: EndpointOptions) -> Self {
        Self::Options(Params::clone(&value))
    }
}

impl From<Value> for SelectorArg {
    fn from(value: Value) -> Self {
        match value {
            Value::String(version) => Self::Version(version),
            Value::Object(options) => Self::Options(options),
            other => Self::Other(other),
        }
    }
}

impl SelectorArg {
    /// Splits the argument into the requested version and the remaining options.
    fn split(self) -> Result<(Option<String>, EndpointOptions), DiscoveryError> {
        match self {
            Self::Version(version) => Ok((Some(version), EndpointOptions::default())),
            Self::Options(mut options) => {
                let version = options.shift_remove("version").map(|version| match version {
                    Value::String(version) => version,
                    other => other.to_string(),
                });
                Ok((version, EndpointOptions::from(options)))
            }
            Self::Other(_) => Err(DiscoveryError::ArgumentError),
        }
    }
}

/// Every discovered version of one API.
#[derive(derive_more::Debug, Clone)]
pub struct ApiVersions {
    name: String,
    versions: IndexMap<String, EndpointType>,
    #[debug(skip)]
    client: ClientHandle,
}

impl ApiVersions {
    /// The API name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Available versions, in directory order.
    pub fn versions(&self) -> impl Iterator<Item = &str> {
        self.versions.keys().map(String::as_str)
    }

    /// The endpoint type of one version.
    pub fn endpoint_type(&self, version: &str) -> Option<&EndpointType> {
        self.versions.get(version)
    }

    /// Builds a new endpoint for a version.
    ///
    /// Accepts a version string, or options carrying a `version` entry; the
    /// other options become the endpoint's construction options. Every call
    /// returns a new instance.
    ///
    /// # Errors
    ///
    /// - [`DiscoveryError::ArgumentError`] when `arg` is neither a string nor an object
    /// - [`DiscoveryError::EndpointUnavailable`] when the version is unknown
    pub fn select(&self, arg: impl Into<SelectorArg>) -> Result<Endpoint, DiscoveryError> {
        let (version, options) = arg.into().split()?;
        let version = version.unwrap_or_default();

        let Some(endpoint_type) = self.versions.get(&version) else {
            return Err(DiscoveryError::EndpointUnavailable {
                name: self.name.clone(),
                message: format!("version '{version}' was not discovered"),
                version,
            });
        };

        Ok(endpoint_type.instantiate_for(options, self.client.clone()))
    }
}

/// Discovered APIs, by name then version.
#[derive(Debug, Clone, Default)]
pub struct ApiRegistry {
    apis: IndexMap<String, ApiVersions>,
}

impl ApiRegistry {
    /// The versions of one API.
    pub fn get(&self, name: &str) -> Option<&ApiVersions> {
        self.apis.get(name)
    }

    /// API names, in directory order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.apis.keys().map(String::as_str)
    }

    /// Number of distinct APIs.
    pub fn len(&self) -> usize {
        self.apis.len()
    }

    /// Whether no API was discovered.
    pub fn is_empty(&self) -> bool {
        self.apis.is_empty()
    }

    /// Builds a new endpoint for `name`, see [`ApiVersions::select`].
    ///
    /// # Errors
    ///
    /// Same as [`ApiVersions::select`], plus [`DiscoveryError::EndpointUnavailable`]
    /// when the API name is unknown.
    pub fn select(
        &self,
        name: &str,
        arg: impl Into<SelectorArg>,
    ) -> Result<Endpoint, DiscoveryError> {
        let arg = arg.into();
        match self.apis.get(name) {
            Some(versions) => versions.select(arg),
            None => {
                let (version, _) = arg.split()?;
                Err(DiscoveryError::EndpointUnavailable {
                    name: name.to_string(),
                    version: version.unwrap_or_default(),
                    message: "API was not discovered".to_string(),
                })
            }
        }
    }

    pub(crate) fn insert(
        &mut self,
        entry: &DirectoryEntry,
        endpoint_type: EndpointType,
        client: &ClientHandle,
    ) {
        self.apis
            .entry(entry.name.clone())
            .or_insert_with(|| ApiVersions {
                name: entry.name.clone(),
                versions: IndexMap::new(),
                client: client.clone(),
            })
            .versions
            .insert(entry.version.clone(), endpoint_type);
    }
}
