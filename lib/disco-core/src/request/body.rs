use headers::ContentType;
use serde::Deserialize;
use serde_json::Value;

use crate::DiscoveryError;

/// Media payload passed to upload methods as the `media` parameter.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct Media {
    #[serde(default)]
    mime_type: Option<String>,
    #[serde(default)]
    body: Value,
}

impl Media {
    pub(super) fn from_value(value: Value) -> Result<Self, DiscoveryError> {
        Ok(serde_json::from_value(value)?)
    }

    fn content_type(&self) -> Result<ContentType, DiscoveryError> {
        let Some(mime_type) = &self.mime_type else {
            return Ok(ContentType::octet_stream());
        };
        let mime = mime_type
            .parse::<mime::Mime>()
            .map_err(|err| DiscoveryError::InvalidMimeType {
                mime_type: mime_type.clone(),
                message: err.to_string(),
            })?;
        Ok(ContentType::from(mime))
    }

    fn data(&self) -> Vec<u8> {
        match &self.body {
            Value::String(text) => text.as_bytes().to_vec(),
            Value::Null => Vec::new(),
            other => other.to_string().into_bytes(),
        }
    }
}

/// The body of an outgoing request with its content type.
#[derive(Clone, derive_more::Debug)]
pub(super) struct RequestBody {
    pub(super) content_type: ContentType,
    #[debug(ignore)]
    pub(super) data: Vec<u8>,
}

impl RequestBody {
    /// A JSON body, used for the `resource` parameter.
    pub(super) fn json(resource: &Value) -> Result<Self, DiscoveryError> {
        let data = serde_json::to_vec(resource)?;
        Ok(Self {
            content_type: ContentType::json(),
            data,
        })
    }

    /// A raw media body (`uploadType=media`).
    pub(super) fn media(media: &Media) -> Result<Self, DiscoveryError> {
        Ok(Self {
            content_type: media.content_type()?,
            data: media.data(),
        })
    }

    /// A `multipart/related` body: the JSON metadata followed by the media.
    ///
    /// Used with `uploadType=multipart`.
    pub(super) fn multipart(
        resource: &Value,
        media: &Media,
        boundary: &str,
    ) -> Result<Self, DiscoveryError> {
        let media_type = media.content_type()?;
        let mut data = Vec::new();

        data.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        data.extend_from_slice(
            format!("Content-Type: {}\r\n\r\n", mime::APPLICATION_JSON).as_bytes(),
        );
        data.extend_from_slice(&serde_json::to_vec(resource)?);
        data.extend_from_slice(format!("\r\n--{boundary}\r\n").as_bytes());
        data.extend_from_slice(format!("Content-Type: {media_type}\r\n\r\n").as_bytes());
        data.extend_from_slice(&media.data());
        data.extend_from_slice(format!("\r\n--{boundary}--").as_bytes());

        let mime = format!("multipart/related; boundary={boundary}")
            .parse::<mime::Mime>()
            .map_err(|err| DiscoveryError::InvalidMimeType {
                mime_type: "multipart/related".to_string(),
                message: err.to_string(),
            })?;

        Ok(Self {
            content_type: ContentType::from(mime),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn should_build_json_body() {
        let body = RequestBody::json(&json!({"name": "report.txt"})).expect("json body");

        assert_eq!(body.content_type, ContentType::json());
        assert_eq!(body.data, br#"{"name":"report.txt"}"#);
    }

    #[test]
    fn should_build_media_body() {
        let media = Media::from_value(json!({"mimeType": "text/plain", "body": "hello"}))
            .expect("valid media");

        let body = RequestBody::media(&media).expect("media body");

        assert_eq!(body.content_type, ContentType::text());
        assert_eq!(body.data, b"hello");
    }

    #[test]
    fn should_default_media_to_octet_stream() {
        let media = Media::from_value(json!({"body": "raw"})).expect("valid media");

        let body = RequestBody::media(&media).expect("media body");

        assert_eq!(body.content_type, ContentType::octet_stream());
    }

    #[test]
    fn should_reject_invalid_mime_type() {
        let media = Media::from_value(json!({"mimeType": "not a mime", "body": "raw"}))
            .expect("valid media");

        let result = RequestBody::media(&media);

        assert!(matches!(
            result,
            Err(DiscoveryError::InvalidMimeType { .. })
        ));
    }

    #[test]
    fn should_build_multipart_body() {
        let media = Media::from_value(json!({"mimeType": "text/plain", "body": "hello"}))
            .expect("valid media");

        let body = RequestBody::multipart(&json!({"name": "a.txt"}), &media, "BOUNDARY")
            .expect("multipart body");

        insta::assert_snapshot!(
            body.content_type.to_string(),
            @"multipart/related; boundary=BOUNDARY"
        );
        insta::assert_snapshot!(
            String::from_utf8_lossy(&body.data).replace("\r\n", "\n"),
            @r#"
        --BOUNDARY
        Content-Type: application/json

        {"name":"a.txt"}
        --BOUNDARY
        Content-Type: text/plain

        hello
        --BOUNDARY--
        "#
        );
    }
}
