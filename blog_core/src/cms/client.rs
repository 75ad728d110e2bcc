//! HTTP client for the external CMS API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, multipart};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

use crate::cms::errors::CmsError;
use crate::cms::types::{
    AiTask, ApiKeyStatus, Article, ArticleInput, ArticleList, ArticleQuery, ArticleStatus,
    Category, CategoryInput, CmsApi, GeneratedApiKey, ImageData, ImageInfo, ImageUpload, Settings,
    Tag, TagInput,
};
use crate::config::{CMS_API_KEY, CMS_API_URL, CMS_TIMEOUT_SECS};
use crate::utils::trim_trailing_slash;

/// `CmsApi` backed by the remote CMS service
#[derive(Debug, Clone)]
pub struct HttpCms {
    client: reqwest::Client,
    base_url: Url,
    api_key: Option<String>,
}

impl HttpCms {
    pub fn new(base_url: &str, api_key: Option<String>, timeout: Duration) -> Result<Self, CmsError> {
        let base_url = Url::parse(&format!("{}/", trim_trailing_slash(base_url)))
            .map_err(|e| CmsError::InvalidUrl(format!("{base_url}: {e}")))?;

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Build a client from `CMS_API_URL`, `CMS_API_KEY` and `CMS_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, CmsError> {
        Self::new(
            CMS_API_URL.as_str(),
            CMS_API_KEY.clone(),
            Duration::from_secs(*CMS_TIMEOUT_SECS),
        )
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, CmsError> {
        let url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| CmsError::InvalidUrl(format!("{path}: {e}")))?;

        tracing::debug!("CMS request: {} {}", method, url);
        let mut builder = self.client.request(method, url);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        Ok(builder)
    }

    async fn send(builder: RequestBuilder) -> Result<Response, CmsError> {
        let response = builder.send().await.map_err(|e| {
            tracing::error!("CMS request failed: {}", e);
            CmsError::from(e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body).unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        });
        tracing::warn!("CMS responded with {}: {}", status, message);

        Err(CmsError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, CmsError> {
        let body = Self::send(builder).await?.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| CmsError::Decode(format!("Failed to deserialize CMS response: {e}")))
    }

    async fn empty(builder: RequestBuilder) -> Result<(), CmsError> {
        Self::send(builder).await.map(|_| ())
    }
}

/// Pull a human-readable message out of a CMS error body.
///
/// Accepts `{error: "..."}`, `{error: {message: "..."}}` and `{message: "..."}`.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("error") {
        Some(Value::String(message)) => Some(message.clone()),
        Some(Value::Object(error)) => error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => value
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string),
    }
}

fn segment(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

/// Percent-encode each segment of an image path, refusing traversal.
fn image_path(path: &str) -> Result<String, CmsError> {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.is_empty() || segments.iter().any(|s| *s == "." || *s == "..") {
        return Err(CmsError::InvalidInput(format!("Invalid image path: {path}")));
    }
    Ok(segments
        .into_iter()
        .map(segment)
        .collect::<Vec<_>>()
        .join("/"))
}

#[async_trait]
impl CmsApi for HttpCms {
    async fn list_articles(&self, query: &ArticleQuery) -> Result<ArticleList, CmsError> {
        Self::json(self.request(Method::GET, "api/articles")?.query(query)).await
    }

    async fn get_article(&self, id: &str) -> Result<Article, CmsError> {
        let path = format!("api/articles/{}", segment(id));
        Self::json(self.request(Method::GET, &path)?).await
    }

    async fn create_article(&self, input: &ArticleInput) -> Result<Article, CmsError> {
        Self::json(self.request(Method::POST, "api/articles")?.json(input)).await
    }

    async fn update_article(&self, id: &str, input: &ArticleInput) -> Result<Article, CmsError> {
        let path = format!("api/articles/{}", segment(id));
        Self::json(self.request(Method::PUT, &path)?.json(input)).await
    }

    async fn delete_article(&self, id: &str) -> Result<(), CmsError> {
        let path = format!("api/articles/{}", segment(id));
        Self::empty(self.request(Method::DELETE, &path)?).await
    }

    async fn set_article_status(
        &self,
        id: &str,
        status: ArticleStatus,
    ) -> Result<Article, CmsError> {
        let action = match status {
            ArticleStatus::Published => "publish",
            ArticleStatus::Draft => "unpublish",
        };
        let path = format!("api/articles/{}/{action}", segment(id));
        Self::json(self.request(Method::POST, &path)?).await
    }

    async fn list_categories(&self) -> Result<Vec<Category>, CmsError> {
        Self::json(self.request(Method::GET, "api/categories")?).await
    }

    async fn create_category(&self, input: &CategoryInput) -> Result<Category, CmsError> {
        Self::json(self.request(Method::POST, "api/categories")?.json(input)).await
    }

    async fn update_category(
        &self,
        id: &str,
        input: &CategoryInput,
    ) -> Result<Category, CmsError> {
        let path = format!("api/categories/{}", segment(id));
        Self::json(self.request(Method::PUT, &path)?.json(input)).await
    }

    async fn delete_category(&self, id: &str) -> Result<(), CmsError> {
        let path = format!("api/categories/{}", segment(id));
        Self::empty(self.request(Method::DELETE, &path)?).await
    }

    async fn reorder_categories(&self, ids: &[String]) -> Result<Vec<Category>, CmsError> {
        Self::json(
            self.request(Method::PUT, "api/categories/reorder")?
                .json(&json!({ "ids": ids })),
        )
        .await
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, CmsError> {
        Self::json(self.request(Method::GET, "api/tags")?).await
    }

    async fn create_tag(&self, input: &TagInput) -> Result<Tag, CmsError> {
        Self::json(self.request(Method::POST, "api/tags")?.json(input)).await
    }

    async fn update_tag(&self, id: &str, input: &TagInput) -> Result<Tag, CmsError> {
        let path = format!("api/tags/{}", segment(id));
        Self::json(self.request(Method::PUT, &path)?.json(input)).await
    }

    async fn delete_tag(&self, id: &str) -> Result<(), CmsError> {
        let path = format!("api/tags/{}", segment(id));
        Self::empty(self.request(Method::DELETE, &path)?).await
    }

    async fn get_settings(&self) -> Result<Settings, CmsError> {
        Self::json(self.request(Method::GET, "api/settings")?).await
    }

    async fn update_settings(&self, settings: &Settings) -> Result<Settings, CmsError> {
        Self::json(self.request(Method::PUT, "api/settings")?.json(settings)).await
    }

    async fn upload_image(&self, upload: ImageUpload) -> Result<ImageInfo, CmsError> {
        let part = multipart::Part::bytes(upload.bytes)
            .file_name(upload.filename)
            .mime_str(&upload.content_type)?;
        let form = multipart::Form::new().part("file", part);
        Self::json(self.request(Method::POST, "api/images")?.multipart(form)).await
    }

    async fn delete_image(&self, id: &str) -> Result<(), CmsError> {
        let path = format!("api/images/{}", segment(id));
        Self::empty(self.request(Method::DELETE, &path)?).await
    }

    async fn fetch_image(&self, path: &str) -> Result<ImageData, CmsError> {
        let path = format!("images/{}", image_path(path)?);
        let response = Self::send(self.request(Method::GET, &path)?).await?;
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response.bytes().await?.to_vec();
        Ok(ImageData {
            content_type,
            bytes,
        })
    }

    async fn api_key_status(&self) -> Result<ApiKeyStatus, CmsError> {
        Self::json(self.request(Method::GET, "api/api-key")?).await
    }

    async fn set_api_key_enabled(&self, enabled: bool) -> Result<ApiKeyStatus, CmsError> {
        let path = if enabled {
            "api/api-key/enable"
        } else {
            "api/api-key/disable"
        };
        Self::json(self.request(Method::POST, path)?).await
    }

    async fn generate_api_key(&self) -> Result<GeneratedApiKey, CmsError> {
        Self::json(self.request(Method::POST, "api/api-key/generate")?).await
    }

    async fn ai(&self, task: AiTask, payload: Value) -> Result<Value, CmsError> {
        let path = format!("api/ai/{}", task.path());
        let builder = match task {
            AiTask::Status => self.request(Method::GET, &path)?,
            _ => self.request(Method::POST, &path)?.json(&payload),
        };
        Self::json(builder).await
    }
}
