//! Hosted-backend bindings over HTTP.
//!
//! One client covers both halves of the service: object storage under
//! `/storage/v1` and the table API under `/rest/v1`. Error payloads are
//! reduced to their `message`/`error` field, which is the text the
//! pipeline's classification heuristic runs on.

use super::{ObjectStorage, RecordStore, UploadOptions};
use crate::config::AppConfig;
use crate::errors::BackendError;
use crate::models::draft::FileAttachment;
use async_trait::async_trait;
use reqwest::header;
use serde_json::Value;

#[derive(Clone)]
pub struct SupabaseClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl SupabaseClient {
    /// Build a client when credentials are present. `None` keeps the rest
    /// of the form usable without a backend (mask, validation, attribution
    /// capture all still work).
    pub fn from_config(cfg: &AppConfig) -> Option<Self> {
        if !cfg.is_backend_configured() {
            return None;
        }
        Some(Self::new(
            cfg.supabase_url.clone(),
            cfg.supabase_anon_key.clone(),
        ))
    }

    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        }
    }

    fn authorized(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("apikey", self.api_key.as_str())
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
    }

    /// Reduce a non-2xx response to the message in its body, falling back
    /// to the raw body or the status line.
    async fn error_from_response(resp: reqwest::Response) -> BackendError {
        let status = resp.status().as_u16();
        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<Value>(&body)
            .ok()
            .and_then(|payload| {
                payload
                    .get("message")
                    .or_else(|| payload.get("error"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .unwrap_or_else(|| {
                if body.is_empty() {
                    format!("status {status}")
                } else {
                    body.clone()
                }
            });
        BackendError::service(message, Some(status))
    }
}

fn transport_error(err: reqwest::Error) -> BackendError {
    BackendError::transport(err.to_string())
}

#[async_trait]
impl ObjectStorage for SupabaseClient {
    async fn upload(
        &self,
        bucket: &str,
        key: &str,
        file: &FileAttachment,
        options: &UploadOptions,
    ) -> Result<(), BackendError> {
        let url = format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, key);
        let resp = self
            .authorized(self.http.post(&url))
            .header(header::CONTENT_TYPE, file.content_type.as_str())
            .header(
                header::CACHE_CONTROL,
                format!("max-age={}", options.cache_control_secs),
            )
            .header("x-upsert", if options.upsert { "true" } else { "false" })
            .body(file.bytes.clone())
            .send()
            .await
            .map_err(transport_error)?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from_response(resp).await)
        }
    }

    fn public_url(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, bucket, key
        )
    }
}

#[async_trait]
impl RecordStore for SupabaseClient {
    async fn insert(&self, table: &str, rows: &[Value]) -> Result<(), BackendError> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        let resp = self
            .authorized(self.http.post(&url))
            .header("Prefer", "return=minimal")
            .json(&rows)
            .send()
            .await
            .map_err(transport_error)?;

        if resp.status().is_success() {
            Ok(())
        } else {
            Err(Self::error_from_response(resp).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::is_schema_mismatch;
    use bytes::Bytes;
    use serde_json::json;

    fn attachment() -> FileAttachment {
        FileAttachment {
            file_name: "conta.pdf".into(),
            content_type: "application/pdf".into(),
            bytes: Bytes::from_static(b"%PDF-1.4"),
        }
    }

    #[tokio::test]
    async fn test_upload_sends_expected_request() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/storage/v1/object/contas-de-luz/123-abc.pdf")
            .match_header("apikey", "anon")
            .match_header("authorization", "Bearer anon")
            .match_header("content-type", "application/pdf")
            .match_header("cache-control", "max-age=3600")
            .match_header("x-upsert", "false")
            .match_body("%PDF-1.4")
            .with_status(200)
            .with_body(r#"{"Key":"contas-de-luz/123-abc.pdf"}"#)
            .create_async()
            .await;

        let client = SupabaseClient::new(server.url(), "anon");
        let result = client
            .upload(
                "contas-de-luz",
                "123-abc.pdf",
                &attachment(),
                &UploadOptions::default(),
            )
            .await;

        assert!(result.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_error_carries_service_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/storage/v1/object/contas-de-luz/k.pdf")
            .with_status(404)
            .with_body(r#"{"statusCode":"404","error":"Bucket not found","message":"Bucket not found"}"#)
            .create_async()
            .await;

        let client = SupabaseClient::new(server.url(), "anon");
        let err = client
            .upload(
                "contas-de-luz",
                "k.pdf",
                &attachment(),
                &UploadOptions::default(),
            )
            .await
            .unwrap_err();

        assert_eq!(err.message, "Bucket not found");
        assert_eq!(err.status, Some(404));
        assert!(!err.transport);
    }

    #[tokio::test]
    async fn test_insert_posts_rows() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/v1/formulario_contatos")
            .match_header("apikey", "anon")
            .match_header("prefer", "return=minimal")
            .match_body(mockito::Matcher::Json(json!([{"nome": "Maria"}])))
            .with_status(201)
            .create_async()
            .await;

        let client = SupabaseClient::new(server.url(), "anon");
        let result = client
            .insert("formulario_contatos", &[json!({"nome": "Maria"})])
            .await;

        assert!(result.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_insert_schema_error_is_detectable() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/rest/v1/formulario_contatos")
            .with_status(400)
            .with_body(r#"{"message":"Could not find the 'utm_source' column of 'formulario_contatos' in the schema cache"}"#)
            .create_async()
            .await;

        let client = SupabaseClient::new(server.url(), "anon");
        let err = client
            .insert("formulario_contatos", &[json!({"utm_source": "fb"})])
            .await
            .unwrap_err();

        assert_eq!(err.status, Some(400));
        assert!(is_schema_mismatch(&err));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let client = SupabaseClient::new("http://127.0.0.1:1", "anon");
        let err = client.insert("t", &[json!({})]).await.unwrap_err();
        assert!(err.transport);
        assert_eq!(err.status, None);
    }

    #[test]
    fn test_public_url_format() {
        let client = SupabaseClient::new("https://proj.supabase.co/", "anon");
        assert_eq!(
            client.public_url("contas-de-luz", "123-abc.pdf"),
            "https://proj.supabase.co/storage/v1/object/public/contas-de-luz/123-abc.pdf"
        );
    }
}
