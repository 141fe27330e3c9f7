use std::sync::Arc;

use tracing::debug;

use super::EndpointContext;
use super::url::{build_url, trim_delimiters};
use crate::request::{ApiResponse, Params, RequestDescriptor};
use crate::schema::{DiscoveryDocument, MethodSchema, extract_path_params};
use crate::{BoxFuture, DiscoveryError};

/// A callable API method generated from a method schema.
///
/// The root document, the method schema and the endpoint context are bound
/// when the method is synthesized; later changes elsewhere never reach an
/// existing method. Calls share no state besides these bindings.
#[derive(Clone, derive_more::Debug)]
pub struct Method {
    #[debug(skip)]
    root: Arc<DiscoveryDocument>,
    schema: MethodSchema,
    #[debug(skip)]
    context: Arc<EndpointContext>,
}

impl Method {
    pub(crate) fn synthesize(
        root: Arc<DiscoveryDocument>,
        schema: MethodSchema,
        context: Arc<EndpointContext>,
    ) -> Self {
        Self {
            root,
            schema,
            context,
        }
    }

    /// The method schema this method was generated from.
    pub fn schema(&self) -> &MethodSchema {
        &self.schema
    }

    /// The endpoint context bound to this method.
    pub fn context(&self) -> &Arc<EndpointContext> {
        &self.context
    }

    /// Describes the call for `params` without executing it.
    pub fn descriptor(&self, params: Params) -> RequestDescriptor {
        let Self {
            root,
            schema,
            context,
        } = self;

        let url = build_url(&format!("{}{}{}", root.root_url, root.service_path, schema.path));
        let url = trim_delimiters(&url).to_string();

        let path_params = extract_path_params(Some(&schema.parameters));

        let media_url = schema.simple_upload_path().map(|upload_path| {
            let media_url = build_url(&format!("{}{upload_path}", root.root_url));
            trim_delimiters(&media_url).to_string()
        });

        RequestDescriptor {
            url,
            http_method: schema.http_method.clone(),
            params,
            required_params: schema.parameter_order.clone(),
            path_params,
            context: Arc::clone(context),
            media_url,
        }
    }

    /// Calls the method, delegating to the endpoint's request executor.
    ///
    /// # Errors
    ///
    /// Whatever the executor reports: missing parameters, transport failures,
    /// unexpected status codes.
    pub fn call(&self, params: Params) -> BoxFuture<'_, Result<ApiResponse, DiscoveryError>> {
        let descriptor = self.descriptor(params);
        debug!(id = ?self.schema.id, url = %descriptor.url, "calling...");
        self.context.executor().execute(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::endpoint::EndpointOptions;
    use crate::testing::RecordingExecutor;

    fn document(json: serde_json::Value) -> Arc<DiscoveryDocument> {
        Arc::new(serde_json::from_value(json).expect("valid document"))
    }

    fn method(json: serde_json::Value) -> MethodSchema {
        serde_json::from_value(json).expect("valid method")
    }

    fn params(json: serde_json::Value) -> Params {
        serde_json::from_value(json).expect("an object")
    }

    fn synthesize(executor: &Arc<RecordingExecutor>, schema: MethodSchema) -> Method {
        let root = document(json!({
            "rootUrl": "https://www.googleapis.com/",
            "servicePath": "drive/v3/"
        }));
        let context = Arc::new(EndpointContext::new(
            EndpointOptions::default(),
            executor.clone(),
            None,
        ));
        Method::synthesize(root, schema, context)
    }

    #[test]
    fn should_describe_call() {
        let executor = Arc::new(RecordingExecutor::default());
        let method = synthesize(
            &executor,
            method(json!({
                "id": "drive.files.get",
                "path": "files/{fileId}",
                "httpMethod": "GET",
                "parameters": {
                    "fileId": {"location": "path", "required": true},
                    "fields": {"location": "query"}
                },
                "parameterOrder": ["fileId"]
            })),
        );

        let descriptor = method.descriptor(params(json!({"fileId": "abc"})));

        insta::assert_debug_snapshot!((
            &descriptor.url,
            &descriptor.http_method,
            &descriptor.params,
            &descriptor.required_params,
            &descriptor.path_params,
            &descriptor.media_url,
        ), @r#"
        (
            "https://www.googleapis.com/drive/v3/files/{fileId}",
            "GET",
            {
                "fileId": String("abc"),
            },
            [
                "fileId",
            ],
            [
                "fileId",
            ],
            None,
        )
        "#);
    }

    #[test]
    fn should_describe_media_url() {
        let executor = Arc::new(RecordingExecutor::default());
        let method = synthesize(
            &executor,
            method(json!({
                "path": "files",
                "httpMethod": "POST",
                "mediaUpload": {"protocols": {"simple": {"path": "upload/drive/v3/files"}}}
            })),
        );

        let descriptor = method.descriptor(Params::new());

        assert_eq!(
            descriptor.media_url.as_deref(),
            Some("https://www.googleapis.com/upload/drive/v3/files")
        );
        assert!(descriptor.required_params.is_empty());
    }

    #[tokio::test]
    async fn should_delegate_to_executor() {
        let executor = Arc::new(RecordingExecutor::default());
        let method = synthesize(&executor, method(json!({"path": "about", "httpMethod": "GET"})));

        let response = method.call(Params::new()).await.expect("recorded");

        assert_eq!(response.status, 200);
        let calls = executor.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].url, "https://www.googleapis.com/drive/v3/about");
        assert_eq!(calls[0].http_method, "GET");
    }

    #[tokio::test]
    async fn should_not_leak_params_between_calls() {
        let executor = Arc::new(RecordingExecutor::default());
        let method = synthesize(&executor, method(json!({"path": "files", "httpMethod": "GET"})));

        method
            .call(params(json!({"q": "first", "pageSize": 10})))
            .await
            .expect("first call");
        method
            .call(params(json!({"q": "second"})))
            .await
            .expect("second call");

        let calls = executor.calls();
        assert_eq!(calls[0].params, params(json!({"q": "first", "pageSize": 10})));
        assert_eq!(calls[1].params, params(json!({"q": "second"})));
    }
}
