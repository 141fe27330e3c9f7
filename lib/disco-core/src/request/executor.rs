use std::sync::Arc;

use headers::HeaderMapExt;
use reqwest::{Method, Request};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::body::{Media, RequestBody};
use super::path::{param_to_string, resolve_path};
use super::{ApiResponse, Params, RequestDescriptor, RequestExecutor};
use crate::client::success_text;
use crate::{BoxFuture, DiscoveryError, Transport};

/// Executes request descriptors as HTTP calls over a [`Transport`].
///
/// For each call:
/// 1. the endpoint's default `params` option is merged under the call parameters
/// 2. required parameters are checked
/// 3. `resource` becomes the JSON body; `media` turns the call into an upload
///    against the method's media URL (multipart when a `resource` is present)
/// 4. path parameters are substituted, everything left becomes the query string
/// 5. the response is decoded as JSON, falling back to text
#[derive(Debug, Clone)]
pub struct HttpRequestExecutor {
    transport: Arc<dyn Transport>,
}

impl HttpRequestExecutor {
    /// Creates an executor sending requests through `transport`.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Builds the HTTP request for a descriptor, without sending it.
    ///
    /// # Errors
    ///
    /// - [`DiscoveryError::MissingRequiredParams`] when a required parameter is absent or `null`
    /// - [`DiscoveryError::InvalidHttpMethod`] when the declared verb is not an HTTP method
    /// - [`DiscoveryError::PathUnresolved`] when a URL placeholder is left unsubstituted
    /// - [`DiscoveryError::InvalidMimeType`] when the `media` MIME type cannot be parsed
    pub fn build_request(&self, descriptor: RequestDescriptor) -> Result<Request, DiscoveryError> {
        let RequestDescriptor {
            url,
            http_method,
            params: call_params,
            required_params,
            path_params,
            context,
            media_url,
        } = descriptor;

        let mut params = context
            .options()
            .default_params()
            .cloned()
            .unwrap_or_default();
        params.extend(call_params);

        let missing: Vec<String> = required_params
            .into_iter()
            .filter(|name| params.get(name).is_none_or(Value::is_null))
            .collect();
        if !missing.is_empty() {
            return Err(DiscoveryError::MissingRequiredParams { missing });
        }

        let method = Method::from_bytes(http_method.to_uppercase().as_bytes())
            .map_err(|_| DiscoveryError::InvalidHttpMethod { method: http_method })?;

        let resource = params.shift_remove("resource").filter(|it| !it.is_null());
        let media = params
            .shift_remove("media")
            .filter(|it| !it.is_null())
            .map(Media::from_value)
            .transpose()?;

        let (template, body) = match (media, media_url) {
            (Some(media), Some(media_url)) => {
                let body = if let Some(resource) = &resource {
                    let boundary = uuid::Uuid::new_v4().simple().to_string();
                    params.insert("uploadType".to_string(), "multipart".into());
                    RequestBody::multipart(resource, &media, &boundary)?
                } else {
                    params.insert("uploadType".to_string(), "media".into());
                    RequestBody::media(&media)?
                };
                (media_url, Some(body))
            }
            (media, _) => {
                if media.is_some() {
                    warn!(%url, "method does not support media upload, ignoring media");
                }
                let body = resource.as_ref().map(RequestBody::json).transpose()?;
                (url, body)
            }
        };

        let path = resolve_path(&template, &path_params, &mut params)?;
        let mut url = Url::parse(&path)?;
        append_query(&mut url, &params);

        let mut request = Request::new(method, url);
        if let Some(RequestBody { content_type, data }) = body {
            request.headers_mut().typed_insert(content_type);
            *request.body_mut() = Some(data.into());
        }

        Ok(request)
    }

    async fn exchange(&self, descriptor: RequestDescriptor) -> Result<ApiResponse, DiscoveryError> {
        let request = self.build_request(descriptor)?;
        debug!(method = %request.method(), url = %request.url(), "sending...");

        let response = self.transport.execute(request).await?;
        let status = response.status().as_u16();
        let text = success_text(response).await?;
        debug!(status, length = text.len(), "received");

        let body = if text.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text).unwrap_or_else(|_| Value::String(text))
        };

        Ok(ApiResponse { status, body })
    }
}

impl RequestExecutor for HttpRequestExecutor {
    fn execute(
        &self,
        descriptor: RequestDescriptor,
    ) -> BoxFuture<'_, Result<ApiResponse, DiscoveryError>> {
        Box::pin(self.exchange(descriptor))
    }
}

/// Appends the remaining parameters as query pairs, repeating array values.
fn append_query(url: &mut Url, params: &Params) {
    let mut pairs = Vec::new();
    for (name, value) in params {
        match value {
            Value::Array(items) => {
                pairs.extend(
                    items
                        .iter()
                        .filter_map(param_to_string)
                        .map(|it| (name.as_str(), it)),
                );
            }
            other => pairs.extend(param_to_string(other).map(|it| (name.as_str(), it))),
        }
    }

    if !pairs.is_empty() {
        url.query_pairs_mut().extend_pairs(pairs);
    }
}
