//! Discovery document type definitions.
//!
//! Only the fields needed to drive client generation are typed; everything the
//! generator does not read is ignored on deserialization. Maps keep their
//! declaration order so that the generated tree is deterministic.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

mod params;
pub use self::params::extract_path_params;

/// Discovery document root, also the shape of every nested resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryDocument {
    /// API name (e.g., "drive", "storage")
    #[serde(default)]
    pub name: Option<String>,

    /// API version (e.g., "v3")
    #[serde(default)]
    pub version: Option<String>,

    /// Root URL (e.g., `https://www.googleapis.com/`)
    #[serde(default)]
    pub root_url: String,

    /// Service path (e.g., "drive/v3/")
    #[serde(default)]
    pub service_path: String,

    /// Root-level resources and methods
    #[serde(flatten)]
    pub schema: ResourceSchema,
}

/// A nested resource: methods and further resources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSchema {
    /// Methods for this resource
    #[serde(default, deserialize_with = "lenient_map")]
    pub methods: IndexMap<String, MethodSchema>,

    /// Nested resources
    #[serde(default, deserialize_with = "lenient_map")]
    pub resources: IndexMap<String, ResourceSchema>,
}

/// Method (API operation)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodSchema {
    /// Method ID (e.g., "drive.files.list")
    #[serde(default)]
    pub id: Option<String>,

    /// URL template, relative to `rootUrl + servicePath`
    #[serde(default)]
    pub path: String,

    /// HTTP verb (GET, POST, PUT, DELETE, PATCH)
    #[serde(default)]
    pub http_method: String,

    /// Parameters, keyed by name
    #[serde(default, deserialize_with = "lenient_map")]
    pub parameters: IndexMap<String, ParameterSchema>,

    /// Names of the required parameters, in call order
    #[serde(default)]
    pub parameter_order: Vec<String>,

    /// Media upload support
    #[serde(default)]
    pub media_upload: Option<MediaUpload>,
}

impl MethodSchema {
    /// The URL template for simple media uploads, if the method supports them.
    pub fn simple_upload_path(&self) -> Option<&str> {
        self.media_upload
            .as_ref()
            .and_then(|upload| upload.protocols.simple.as_ref())
            .and_then(|simple| simple.path.as_deref())
    }
}

/// Parameter definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Location (path, query, ...)
    #[serde(default)]
    pub location: Option<String>,

    /// Parameter type (string, integer, boolean, etc.)
    #[serde(rename = "type", default)]
    pub param_type: Option<String>,

    /// Required flag
    #[serde(default)]
    pub required: bool,

    /// Whether the parameter may be repeated
    #[serde(default)]
    pub repeated: bool,
}

/// Media upload configuration of a method.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaUpload {
    /// Accepted MIME ranges
    #[serde(default)]
    pub accept: Vec<String>,

    /// Supported upload protocols
    #[serde(default)]
    pub protocols: MediaUploadProtocols,
}

/// Supported upload protocols.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaUploadProtocols {
    /// Single-request upload
    #[serde(default)]
    pub simple: Option<UploadProtocol>,

    /// Resumable upload
    #[serde(default)]
    pub resumable: Option<UploadProtocol>,
}

/// One upload protocol.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadProtocol {
    /// The URI path to be used for upload
    #[serde(default)]
    pub path: Option<String>,

    /// True if this endpoint supports multipart media
    #[serde(default)]
    pub multipart: bool,
}

/// A discovery directory: the list of available APIs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DirectoryList {
    /// One row per API version
    #[serde(default)]
    pub items: Vec<DirectoryEntry>,
}

/// One row of a discovery directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    /// Directory identifier (e.g., "drive:v3")
    #[serde(default)]
    pub id: Option<String>,

    /// API name
    pub name: String,

    /// API version
    pub version: String,

    /// Human readable title
    #[serde(default)]
    pub title: Option<String>,

    /// Whether this is the preferred version of the API
    #[serde(default)]
    pub preferred: bool,

    /// URL of this API's own discovery document
    pub discovery_rest_url: String,
}

/// Accept anything where a map is expected, treating non-objects as empty.
fn lenient_map<'de, D, T>(deserializer: D) -> Result<IndexMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Object(map) => map
            .into_iter()
            .map(|(key, value)| {
                serde_json::from_value(value)
                    .map(|it| (key, it))
                    .map_err(<D::Error as serde::de::Error>::custom)
            })
            .collect(),
        _ => Ok(IndexMap::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_minimal_document() {
        let json = r#"{
            "rootUrl": "https://www.googleapis.com/",
            "servicePath": "drive/v3/"
        }"#;

        let doc: DiscoveryDocument = serde_json::from_str(json).expect("valid document");

        assert_eq!(doc.root_url, "https://www.googleapis.com/");
        assert_eq!(doc.service_path, "drive/v3/");
        assert!(doc.schema.resources.is_empty());
        assert!(doc.schema.methods.is_empty());
    }

    #[test]
    fn should_keep_declaration_order() {
        let json = r#"{
            "resources": {
                "zebra": {},
                "alpha": {},
                "middle": {}
            }
        }"#;

        let doc: DiscoveryDocument = serde_json::from_str(json).expect("valid document");

        let names: Vec<_> = doc.schema.resources.keys().map(String::as_str).collect();
        assert_eq!(names, ["zebra", "alpha", "middle"]);
    }

    #[test]
    fn should_treat_non_object_parameters_as_empty() {
        let json = r#"{"path": "ping", "httpMethod": "GET", "parameters": "oops"}"#;

        let method: MethodSchema = serde_json::from_str(json).expect("valid method");

        assert!(method.parameters.is_empty());
    }

    #[test]
    fn should_read_simple_upload_path() {
        let json = r#"{
            "path": "files",
            "httpMethod": "POST",
            "mediaUpload": {
                "accept": ["*/*"],
                "protocols": {
                    "simple": {"multipart": true, "path": "/upload/drive/v3/files"},
                    "resumable": {"multipart": true, "path": "/resumable/upload/drive/v3/files"}
                }
            }
        }"#;

        let method: MethodSchema = serde_json::from_str(json).expect("valid method");

        assert_eq!(method.simple_upload_path(), Some("/upload/drive/v3/files"));
    }

    #[test]
    fn should_parse_directory() {
        let json = r#"{
            "kind": "discovery#directoryList",
            "items": [{
                "kind": "discovery#directoryItem",
                "id": "drive:v3",
                "name": "drive",
                "version": "v3",
                "title": "Google Drive API",
                "discoveryRestUrl": "https://www.googleapis.com/discovery/v1/apis/drive/v3/rest",
                "preferred": true
            }]
        }"#;

        let directory: DirectoryList = serde_json::from_str(json).expect("valid directory");

        insta::assert_debug_snapshot!(directory, @r#"
        DirectoryList {
            items: [
                DirectoryEntry {
                    id: Some(
                        "drive:v3",
                    ),
                    name: "drive",
                    version: "v3",
                    title: Some(
                        "Google Drive API",
                    ),
                    preferred: true,
                    discovery_rest_url: "https://www.googleapis.com/discovery/v1/apis/drive/v3/rest",
                },
            ],
        }
        "#);
    }
}
