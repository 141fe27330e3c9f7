use std::path::{Path, PathBuf};

use url::Url;

use super::DiscoveryError;
use crate::request::Params;
use crate::schema::DiscoveryDocument;

/// Where a discovery document comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum DiscoverySource {
    /// A local file holding the document.
    Path(PathBuf),
    /// A document fetched with a plain GET.
    Url(Url),
    /// A document fetched through the request executor, with extra query parameters.
    Request {
        /// The document URL.
        url: Url,
        /// Parameters forwarded as the query string.
        params: Params,
    },
    /// An already parsed document.
    Document(Box<DiscoveryDocument>),
}

impl DiscoverySource {
    /// Reads a location: a URL when it has a scheme, a file path otherwise.
    ///
    /// Single letter schemes are Windows drive letters and read as paths.
    pub fn parse_location(location: &str) -> Self {
        match Url::parse(location) {
            Ok(url) if url.scheme().len() > 1 => Self::Url(url),
            _ => Self::Path(PathBuf::from(location)),
        }
    }

    /// A location for logs and error messages.
    pub(crate) fn name(&self) -> String {
        match self {
            Self::Path(path) => path.display().to_string(),
            Self::Url(url) | Self::Request { url, .. } => url.to_string(),
            Self::Document(doc) => doc.name.clone().unwrap_or_else(|| "<document>".to_string()),
        }
    }
}

impl From<&str> for DiscoverySource {
    fn from(value: &str) -> Self {
        Self::parse_location(value)
    }
}

impl From<String> for DiscoverySource {
    fn from(value: String) -> Self {
        Self::parse_location(&value)
    }
}

impl From<&Path> for DiscoverySource {
    fn from(value: &Path) -> Self {
        Self::Path(value.to_path_buf())
    }
}

impl From<PathBuf> for DiscoverySource {
    fn from(value: PathBuf) -> Self {
        Self::Path(value)
    }
}

impl From<Url> for DiscoverySource {
    fn from(value: Url) -> Self {
        Self::Url(value)
    }
}

impl From<DiscoveryDocument> for DiscoverySource {
    fn from(value: DiscoveryDocument) -> Self {
        Self::Document(Box::new(value))
    }
}

/// Options object form: a `url` entry plus query parameters.
impl TryFrom<Params> for DiscoverySource {
    type Error = DiscoveryError;

    fn try_from(mut value: Params) -> Result<Self, Self::Error> {
        let url = match value.shift_remove("url") {
            Some(serde_json::Value::String(url)) => Url::parse(&url)?,
            _ => return Err(DiscoveryError::ArgumentError),
        };
        Ok(Self::Request { url, params: value })
    }
}
