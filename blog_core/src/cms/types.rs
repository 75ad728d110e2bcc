use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cms::errors::CmsError;

/// Publish state of an article as reported by the CMS
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
}

impl ArticleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleStatus::Draft => "draft",
            ArticleStatus::Published => "published",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(alias = "hash")]
    pub id: String,
    #[serde(default)]
    pub slug: Option<String>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    /// Tag names
    #[serde(default)]
    pub tags: Vec<String>,
    /// Category slug
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,
    #[serde(default)]
    pub status: ArticleStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
}

impl Article {
    pub fn is_published(&self) -> bool {
        self.status == ArticleStatus::Published
    }

    /// Date shown to readers: publication time, else creation time.
    pub fn display_date(&self) -> DateTime<Utc> {
        self.published_at.unwrap_or(self.created_at)
    }

    /// Key used in public URLs: the slug when present, the id otherwise.
    pub fn route_key(&self) -> &str {
        self.slug.as_deref().filter(|s| !s.is_empty()).unwrap_or(&self.id)
    }
}

/// Create/update payload for an article. Absent fields are left unchanged on update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ArticleInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
}

impl ArticleInput {
    /// A new article needs a non-blank title.
    pub fn validate_for_create(&self) -> Result<(), CmsError> {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => Ok(()),
            _ => Err(CmsError::InvalidInput("Title is required".to_string())),
        }
    }
}

/// Query parameters accepted by the CMS article listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ArticleQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ArticleStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArticleList {
    pub items: Vec<Article>,
    pub total: usize,
    pub page: u32,
    pub page_size: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
    #[serde(default)]
    pub article_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct CategoryInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub article_count: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct TagInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

/// Site settings are opaque key/value pairs owned by the CMS.
pub type Settings = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ApiKeyStatus {
    pub enabled: bool,
    #[serde(default)]
    pub key_preview: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_used_at: Option<DateTime<Utc>>,
}

/// A freshly generated API key; the full key is only ever returned once.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedApiKey {
    pub key: String,
    pub status: ApiKeyStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ImageInfo {
    pub id: String,
    pub url: String,
    pub filename: String,
    pub content_type: String,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub filename: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct ImageData {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// AI-assisted authoring operations served by the CMS-side AI service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiTask {
    Outline,
    Continue,
    Transform,
    Metadata,
    Review,
    Status,
    TestKey,
}

impl AiTask {
    pub fn path(&self) -> &'static str {
        match self {
            AiTask::Outline => "outline",
            AiTask::Continue => "continue",
            AiTask::Transform => "transform",
            AiTask::Metadata => "metadata",
            AiTask::Review => "review",
            AiTask::Status => "status",
            AiTask::TestKey => "test-key",
        }
    }
}

/// Page size used when walking the whole published catalogue.
const PUBLISHED_FETCH_PAGE_SIZE: u32 = 100;

/// Operations the web tier needs from the content service
#[async_trait]
pub trait CmsApi: Send + Sync + 'static {
    async fn list_articles(&self, query: &ArticleQuery) -> Result<ArticleList, CmsError>;

    async fn get_article(&self, id: &str) -> Result<Article, CmsError>;

    async fn create_article(&self, input: &ArticleInput) -> Result<Article, CmsError>;

    async fn update_article(&self, id: &str, input: &ArticleInput) -> Result<Article, CmsError>;

    async fn delete_article(&self, id: &str) -> Result<(), CmsError>;

    /// Publish or unpublish.
    async fn set_article_status(
        &self,
        id: &str,
        status: ArticleStatus,
    ) -> Result<Article, CmsError>;

    async fn list_categories(&self) -> Result<Vec<Category>, CmsError>;

    async fn create_category(&self, input: &CategoryInput) -> Result<Category, CmsError>;

    async fn update_category(&self, id: &str, input: &CategoryInput)
    -> Result<Category, CmsError>;

    async fn delete_category(&self, id: &str) -> Result<(), CmsError>;

    /// Apply the given order; ids not listed keep their relative order after the listed ones.
    async fn reorder_categories(&self, ids: &[String]) -> Result<Vec<Category>, CmsError>;

    async fn list_tags(&self) -> Result<Vec<Tag>, CmsError>;

    async fn create_tag(&self, input: &TagInput) -> Result<Tag, CmsError>;

    async fn update_tag(&self, id: &str, input: &TagInput) -> Result<Tag, CmsError>;

    async fn delete_tag(&self, id: &str) -> Result<(), CmsError>;

    async fn get_settings(&self) -> Result<Settings, CmsError>;

    async fn update_settings(&self, settings: &Settings) -> Result<Settings, CmsError>;

    async fn upload_image(&self, upload: ImageUpload) -> Result<ImageInfo, CmsError>;

    async fn delete_image(&self, id: &str) -> Result<(), CmsError>;

    /// Fetch a CMS-hosted image file by its public path.
    async fn fetch_image(&self, path: &str) -> Result<ImageData, CmsError>;

    async fn api_key_status(&self) -> Result<ApiKeyStatus, CmsError>;

    async fn set_api_key_enabled(&self, enabled: bool) -> Result<ApiKeyStatus, CmsError>;

    async fn generate_api_key(&self) -> Result<GeneratedApiKey, CmsError>;

    async fn ai(&self, task: AiTask, payload: Value) -> Result<Value, CmsError>;

    /// Every published article, walking the listing page by page.
    async fn list_all_published(&self) -> Result<Vec<Article>, CmsError> {
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let query = ArticleQuery {
                page: Some(page),
                page_size: Some(PUBLISHED_FETCH_PAGE_SIZE),
                status: Some(ArticleStatus::Published),
                ..Default::default()
            };
            let batch = self.list_articles(&query).await?;
            let fetched = batch.items.len();
            all.extend(batch.items);

            if fetched == 0 || all.len() >= batch.total {
                break;
            }
            page += 1;
        }

        tracing::debug!("Fetched {} published articles", all.len());
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_article_accepts_hash_alias_and_defaults() {
        let article: Article = serde_json::from_value(json!({
            "hash": "a1b2",
            "title": "Hello",
            "createdAt": "2024-01-02T03:04:05Z",
            "updatedAt": "2024-01-02T03:04:05Z"
        }))
        .unwrap();
        assert_eq!(article.id, "a1b2");
        assert_eq!(article.status, ArticleStatus::Draft);
        assert!(article.tags.is_empty());
        assert_eq!(article.route_key(), "a1b2");
        assert_eq!(article.display_date(), article.created_at);
    }

    #[test]
    fn test_route_key_prefers_slug() {
        let mut article: Article = serde_json::from_value(json!({
            "id": "x",
            "slug": "hello-world",
            "title": "Hello",
            "status": "published",
            "createdAt": "2024-01-02T03:04:05Z",
            "updatedAt": "2024-01-02T03:04:05Z",
            "publishedAt": "2024-02-01T00:00:00Z"
        }))
        .unwrap();
        assert!(article.is_published());
        assert_eq!(article.route_key(), "hello-world");
        assert_eq!(article.display_date().to_rfc3339(), "2024-02-01T00:00:00+00:00");

        article.slug = Some(String::new());
        assert_eq!(article.route_key(), "x");
    }

    #[test]
    fn test_article_input_skips_absent_fields() {
        let input = ArticleInput {
            title: Some("T".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&input).unwrap(), json!({"title": "T"}));
    }

    #[test]
    fn test_article_input_create_validation() {
        assert!(ArticleInput::default().validate_for_create().is_err());
        let blank = ArticleInput {
            title: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(blank.validate_for_create().is_err());
        let ok = ArticleInput {
            title: Some("Title".to_string()),
            ..Default::default()
        };
        assert!(ok.validate_for_create().is_ok());
    }

    #[test]
    fn test_ai_task_paths() {
        assert_eq!(AiTask::TestKey.path(), "test-key");
        assert_eq!(AiTask::Outline.path(), "outline");
    }
}
