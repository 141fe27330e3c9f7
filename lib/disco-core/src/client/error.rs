/// Errors that can occur while discovering APIs or calling generated methods.
///
/// Every asynchronous entry point reports failures through this type; the
/// only synchronous failures are the registry selector misuses
/// ([`DiscoveryError::ArgumentError`] and [`DiscoveryError::EndpointUnavailable`]).
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum DiscoveryError {
    /// HTTP client error from the underlying reqwest library.
    ///
    /// Occurs when network requests fail, timeouts occur, or connection issues arise.
    ReqwestError(reqwest::Error),

    /// URL parsing error when constructing request URLs.
    UrlError(url::ParseError),

    /// HTTP protocol error from the http crate.
    HttpError(http::Error),

    /// JSON serialization error.
    ///
    /// Occurs when encoding a request body.
    JsonValueError(serde_json::Error),

    /// A local discovery document could not be read.
    #[display("Failed to read discovery document '{path}': {error}")]
    #[from(skip)]
    ReadDocument {
        /// The file path that was requested.
        path: String,
        /// The underlying I/O error.
        error: std::io::Error,
    },

    /// A discovery document or directory could not be parsed.
    #[display("Failed to parse discovery document from '{source_name}': {error}")]
    #[from(skip)]
    ParseDocument {
        /// Where the document came from (file path or URL).
        source_name: String,
        /// The underlying JSON error.
        error: serde_json::Error,
    },

    /// Server returned a non-successful HTTP status code.
    #[display("Unexpected status code {status_code}: {body}")]
    #[from(skip)]
    UnexpectedStatusCode {
        /// The HTTP status code received.
        status_code: u16,
        /// The response body, truncated for readability.
        body: String,
    },

    /// A method was called without all of its required parameters.
    #[display("Missing required parameters: {}", missing.join(", "))]
    #[from(skip)]
    MissingRequiredParams {
        /// Names of the absent parameters, in declaration order.
        missing: Vec<String>,
    },

    /// URL template contains placeholders nobody supplied.
    #[display("Path '{path}' is missing required arguments: {missings:?}")]
    #[from(skip)]
    PathUnresolved {
        /// The partially resolved URL.
        path: String,
        /// Names of the unresolved placeholders.
        missings: Vec<String>,
    },

    /// The method schema declares a verb that is not a valid HTTP method.
    #[display("Invalid HTTP method: {method}")]
    #[from(skip)]
    InvalidHttpMethod {
        /// The verb as written in the discovery document.
        method: String,
    },

    /// The `media` parameter carries a MIME type that cannot be parsed.
    #[display("Invalid MIME type '{mime_type}': {message}")]
    #[from(skip)]
    InvalidMimeType {
        /// The MIME type as supplied.
        mime_type: String,
        /// The parser message.
        message: String,
    },

    /// A registry selector was called with something other than a version or options.
    #[display("Argument error: Accepts only string or object")]
    #[from(skip)]
    ArgumentError,

    /// A registry selector could not produce an endpoint.
    #[display("Unable to load endpoint {name}(\"{version}\"): {message}")]
    #[from(skip)]
    EndpointUnavailable {
        /// The API name.
        name: String,
        /// The requested version.
        version: String,
        /// Why the endpoint could not be built.
        message: String,
    },

    /// A discovery task was cancelled or panicked.
    TaskJoinError(tokio::task::JoinError),
}
