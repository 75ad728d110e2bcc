//! In-process `CmsApi` used for local development and tests

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use serde_json::{Value, json};
use tokio::sync::RwLock;

use crate::cms::errors::CmsError;
use crate::cms::types::{
    AiTask, ApiKeyStatus, Article, ArticleInput, ArticleList, ArticleQuery, ArticleStatus,
    Category, CategoryInput, CmsApi, GeneratedApiKey, ImageData, ImageInfo, ImageUpload, Settings,
    Tag, TagInput,
};
use crate::pagination::paginate;
use crate::utils::{gen_random_string, slugify};

const DEFAULT_LIST_PAGE_SIZE: u32 = 20;

#[derive(Debug, Default)]
struct MemoryState {
    articles: Vec<Article>,
    categories: Vec<Category>,
    tags: Vec<Tag>,
    settings: Settings,
    /// Keyed by public path (`{id}/{filename}`)
    images: HashMap<String, (ImageInfo, ImageData)>,
    api_key: ApiKeyStatus,
    api_key_secret: Option<String>,
}

#[derive(Debug, Default)]
pub struct MemoryCms {
    state: RwLock<MemoryState>,
}

fn new_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

fn required(value: Option<&str>, message: &str) -> Result<String, CmsError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(CmsError::InvalidInput(message.to_string())),
    }
}

fn conflict(message: impl Into<String>) -> CmsError {
    CmsError::Status {
        status: 409,
        message: message.into(),
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches_query(article: &Article, query: &ArticleQuery) -> bool {
    if let Some(status) = query.status {
        if article.status != status {
            return false;
        }
    }
    if let Some(category) = query.category.as_deref() {
        if !article
            .category
            .as_deref()
            .is_some_and(|c| c.eq_ignore_ascii_case(category))
        {
            return false;
        }
    }
    if let Some(tag) = query.tag.as_deref() {
        if !article
            .tags
            .iter()
            .any(|t| t.eq_ignore_ascii_case(tag) || slugify(t) == slugify(tag))
        {
            return false;
        }
    }
    if let Some(search) = query.search.as_deref().filter(|s| !s.trim().is_empty()) {
        let search = search.trim();
        if !(contains_ci(&article.title, search)
            || contains_ci(&article.description, search)
            || contains_ci(&article.content, search))
        {
            return false;
        }
    }
    true
}

impl MemoryState {
    fn article_index(&self, id: &str) -> Result<usize, CmsError> {
        self.articles
            .iter()
            .position(|a| a.id == id || a.slug.as_deref() == Some(id))
            .ok_or_else(|| CmsError::not_found("Article not found"))
    }

    fn ensure_tags(&mut self, names: &[String]) {
        for name in names {
            if !self.tags.iter().any(|t| t.name.eq_ignore_ascii_case(name)) {
                self.tags.push(Tag {
                    id: new_id(),
                    name: name.clone(),
                    slug: slugify(name),
                    article_count: None,
                });
            }
        }
    }

    fn slug_taken(&self, slug: &str, except_id: Option<&str>) -> bool {
        self.articles
            .iter()
            .any(|a| a.slug.as_deref() == Some(slug) && Some(a.id.as_str()) != except_id)
    }

    fn categories_sorted(&self) -> Vec<Category> {
        let mut categories: Vec<Category> = self
            .categories
            .iter()
            .map(|c| Category {
                article_count: Some(
                    self.articles
                        .iter()
                        .filter(|a| a.category.as_deref() == Some(c.slug.as_str()))
                        .count() as u32,
                ),
                ..c.clone()
            })
            .collect();
        categories.sort_by_key(|c| c.sort_order);
        categories
    }

    fn tag_with_count(&self, tag: &Tag) -> Tag {
        Tag {
            article_count: Some(
                self.articles
                    .iter()
                    .filter(|a| a.tags.iter().any(|t| t.eq_ignore_ascii_case(&tag.name)))
                    .count() as u32,
            ),
            ..tag.clone()
        }
    }
}

impl MemoryCms {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_articles(mut self, articles: Vec<Article>) -> Self {
        let state = self.state.get_mut();
        for article in &articles {
            let tags = article.tags.clone();
            state.ensure_tags(&tags);
        }
        state.articles.extend(articles);
        self
    }

    pub fn with_categories(mut self, categories: Vec<Category>) -> Self {
        self.state.get_mut().categories.extend(categories);
        self
    }

    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.state.get_mut().settings = settings;
        self
    }
}

#[async_trait]
impl CmsApi for MemoryCms {
    async fn list_articles(&self, query: &ArticleQuery) -> Result<ArticleList, CmsError> {
        let state = self.state.read().await;
        let mut matching: Vec<Article> = state
            .articles
            .iter()
            .filter(|a| matches_query(a, query))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.display_date().cmp(&a.display_date()));

        let page = query.page.unwrap_or(1).max(1);
        let page_size = query.page_size.unwrap_or(DEFAULT_LIST_PAGE_SIZE).max(1);

        Ok(ArticleList {
            items: paginate(&matching, page, page_size).to_vec(),
            total: matching.len(),
            page,
            page_size,
        })
    }

    async fn get_article(&self, id: &str) -> Result<Article, CmsError> {
        let state = self.state.read().await;
        let index = state.article_index(id)?;
        Ok(state.articles[index].clone())
    }

    async fn create_article(&self, input: &ArticleInput) -> Result<Article, CmsError> {
        input.validate_for_create()?;
        let title = required(input.title.as_deref(), "Title is required")?;

        let mut state = self.state.write().await;
        let slug = input
            .slug
            .as_deref()
            .map(slugify)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slugify(&title));
        if !slug.is_empty() && state.slug_taken(&slug, None) {
            return Err(conflict(format!("Slug already in use: {slug}")));
        }

        let tags = input.tags.clone().unwrap_or_default();
        state.ensure_tags(&tags);

        let now = Utc::now();
        let article = Article {
            id: new_id(),
            slug: Some(slug).filter(|s| !s.is_empty()),
            title,
            description: input.description.clone().unwrap_or_default(),
            content: input.content.clone().unwrap_or_default(),
            tags,
            category: input.category.clone().filter(|c| !c.is_empty()),
            cover_image: input.cover_image.clone().filter(|c| !c.is_empty()),
            status: ArticleStatus::Draft,
            created_at: now,
            updated_at: now,
            published_at: None,
        };
        state.articles.push(article.clone());

        tracing::debug!("Created article {}", article.id);
        Ok(article)
    }

    async fn update_article(&self, id: &str, input: &ArticleInput) -> Result<Article, CmsError> {
        let mut state = self.state.write().await;
        let index = state.article_index(id)?;
        let article_id = state.articles[index].id.clone();

        let title = match input.title.as_deref() {
            Some(title) => Some(required(Some(title), "Title is required")?),
            None => None,
        };
        let slug = input.slug.as_deref().map(slugify).filter(|s| !s.is_empty());
        if let Some(slug) = slug.as_deref() {
            if state.slug_taken(slug, Some(&article_id)) {
                return Err(conflict(format!("Slug already in use: {slug}")));
            }
        }
        if let Some(tags) = input.tags.as_deref() {
            state.ensure_tags(tags);
        }

        let article = &mut state.articles[index];
        if let Some(title) = title {
            article.title = title;
        }
        if slug.is_some() {
            article.slug = slug;
        }
        if let Some(description) = &input.description {
            article.description = description.clone();
        }
        if let Some(content) = &input.content {
            article.content = content.clone();
        }
        if let Some(tags) = &input.tags {
            article.tags = tags.clone();
        }
        if let Some(category) = &input.category {
            article.category = Some(category.clone()).filter(|c| !c.is_empty());
        }
        if let Some(cover_image) = &input.cover_image {
            article.cover_image = Some(cover_image.clone()).filter(|c| !c.is_empty());
        }
        article.updated_at = Utc::now();

        Ok(article.clone())
    }

    async fn delete_article(&self, id: &str) -> Result<(), CmsError> {
        let mut state = self.state.write().await;
        let index = state.article_index(id)?;
        state.articles.remove(index);
        Ok(())
    }

    async fn set_article_status(
        &self,
        id: &str,
        status: ArticleStatus,
    ) -> Result<Article, CmsError> {
        let mut state = self.state.write().await;
        let index = state.article_index(id)?;
        let article = &mut state.articles[index];

        let now = Utc::now();
        article.status = status;
        if status == ArticleStatus::Published && article.published_at.is_none() {
            article.published_at = Some(now);
        }
        article.updated_at = now;

        Ok(article.clone())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, CmsError> {
        Ok(self.state.read().await.categories_sorted())
    }

    async fn create_category(&self, input: &CategoryInput) -> Result<Category, CmsError> {
        let name = required(input.name.as_deref(), "Name is required")?;
        let slug = input
            .slug
            .as_deref()
            .map(slugify)
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| slugify(&name));

        let mut state = self.state.write().await;
        if state.categories.iter().any(|c| c.slug == slug) {
            return Err(conflict(format!("Category already exists: {slug}")));
        }

        let sort_order = state
            .categories
            .iter()
            .map(|c| c.sort_order + 1)
            .max()
            .unwrap_or(0);
        let category = Category {
            id: new_id(),
            name,
            slug,
            description: input.description.clone(),
            sort_order,
            article_count: Some(0),
        };
        state.categories.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        id: &str,
        input: &CategoryInput,
    ) -> Result<Category, CmsError> {
        let mut state = self.state.write().await;
        let index = state
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CmsError::not_found("Category not found"))?;

        let name = match input.name.as_deref() {
            Some(name) => Some(required(Some(name), "Name is required")?),
            None => None,
        };
        let slug = input.slug.as_deref().map(slugify).filter(|s| !s.is_empty());
        if let Some(slug) = slug.as_deref() {
            if state.categories.iter().any(|c| c.slug == slug && c.id != id) {
                return Err(conflict(format!("Category already exists: {slug}")));
            }
        }

        let old_slug = state.categories[index].slug.clone();
        if let Some(new_slug) = slug.as_deref().filter(|s| *s != old_slug) {
            for article in state
                .articles
                .iter_mut()
                .filter(|a| a.category.as_deref() == Some(old_slug.as_str()))
            {
                article.category = Some(new_slug.to_string());
            }
        }

        let category = &mut state.categories[index];
        if let Some(name) = name {
            category.name = name;
        }
        if let Some(slug) = slug {
            category.slug = slug;
        }
        if input.description.is_some() {
            category.description = input.description.clone();
        }
        let updated = category.clone();

        Ok(state
            .categories_sorted()
            .into_iter()
            .find(|c| c.id == updated.id)
            .unwrap_or(updated))
    }

    async fn delete_category(&self, id: &str) -> Result<(), CmsError> {
        let mut state = self.state.write().await;
        let index = state
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| CmsError::not_found("Category not found"))?;
        let removed = state.categories.remove(index);

        for article in state
            .articles
            .iter_mut()
            .filter(|a| a.category.as_deref() == Some(removed.slug.as_str()))
        {
            article.category = None;
        }
        Ok(())
    }

    async fn reorder_categories(&self, ids: &[String]) -> Result<Vec<Category>, CmsError> {
        let mut state = self.state.write().await;
        if let Some(unknown) = ids
            .iter()
            .find(|id| !state.categories.iter().any(|c| &c.id == *id))
        {
            return Err(CmsError::InvalidInput(format!("Unknown category: {unknown}")));
        }

        let mut current = state.categories_sorted();
        current.sort_by_key(|c| {
            ids.iter()
                .position(|id| *id == c.id)
                .unwrap_or(ids.len())
        });
        for (order, category) in current.iter().enumerate() {
            if let Some(stored) = state.categories.iter_mut().find(|c| c.id == category.id) {
                stored.sort_order = order as i32;
            }
        }

        Ok(state.categories_sorted())
    }

    async fn list_tags(&self) -> Result<Vec<Tag>, CmsError> {
        let state = self.state.read().await;
        let mut tags: Vec<Tag> = state.tags.iter().map(|t| state.tag_with_count(t)).collect();
        tags.sort_by_key(|t| t.name.to_lowercase());
        Ok(tags)
    }

    async fn create_tag(&self, input: &TagInput) -> Result<Tag, CmsError> {
        let name = required(input.name.as_deref(), "Name is required")?;
        let mut state = self.state.write().await;
        if state.tags.iter().any(|t| t.name.eq_ignore_ascii_case(&name)) {
            return Err(conflict(format!("Tag already exists: {name}")));
        }

        let tag = Tag {
            id: new_id(),
            slug: input
                .slug
                .as_deref()
                .map(slugify)
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| slugify(&name)),
            name,
            article_count: Some(0),
        };
        state.tags.push(tag.clone());
        Ok(tag)
    }

    async fn update_tag(&self, id: &str, input: &TagInput) -> Result<Tag, CmsError> {
        let mut state = self.state.write().await;
        let index = state
            .tags
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CmsError::not_found("Tag not found"))?;

        let old_name = state.tags[index].name.clone();
        if let Some(name) = input.name.as_deref() {
            let name = required(Some(name), "Name is required")?;
            if state
                .tags
                .iter()
                .any(|t| t.id != id && t.name.eq_ignore_ascii_case(&name))
            {
                return Err(conflict(format!("Tag already exists: {name}")));
            }
            for tag in state
                .articles
                .iter_mut()
                .flat_map(|a| a.tags.iter_mut())
                .filter(|t| t.eq_ignore_ascii_case(&old_name))
            {
                *tag = name.clone();
            }
            state.tags[index].name = name;
        }
        if let Some(slug) = input.slug.as_deref().map(slugify).filter(|s| !s.is_empty()) {
            state.tags[index].slug = slug;
        }

        Ok(state.tag_with_count(&state.tags[index]))
    }

    async fn delete_tag(&self, id: &str) -> Result<(), CmsError> {
        let mut state = self.state.write().await;
        let index = state
            .tags
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| CmsError::not_found("Tag not found"))?;
        let removed = state.tags.remove(index);

        for article in state.articles.iter_mut() {
            article.tags.retain(|t| !t.eq_ignore_ascii_case(&removed.name));
        }
        Ok(())
    }

    async fn get_settings(&self) -> Result<Settings, CmsError> {
        Ok(self.state.read().await.settings.clone())
    }

    async fn update_settings(&self, settings: &Settings) -> Result<Settings, CmsError> {
        let mut state = self.state.write().await;
        for (key, value) in settings {
            state.settings.insert(key.clone(), value.clone());
        }
        Ok(state.settings.clone())
    }

    async fn upload_image(&self, upload: ImageUpload) -> Result<ImageInfo, CmsError> {
        if !upload.content_type.starts_with("image/") {
            return Err(CmsError::InvalidInput(format!(
                "Unsupported content type: {}",
                upload.content_type
            )));
        }
        if upload.bytes.is_empty() {
            return Err(CmsError::InvalidInput("Empty file".to_string()));
        }

        let id = new_id();
        let filename = match upload.filename.rsplit_once('.') {
            Some((stem, ext)) if !slugify(stem).is_empty() => {
                format!("{}.{}", slugify(stem), ext.to_ascii_lowercase())
            }
            _ => "image".to_string(),
        };
        let path = format!("{id}/{filename}");
        let info = ImageInfo {
            id,
            url: format!("/images/{path}"),
            filename,
            content_type: upload.content_type.clone(),
            size: upload.bytes.len() as u64,
        };
        let data = ImageData {
            content_type: upload.content_type,
            bytes: upload.bytes,
        };

        self.state
            .write()
            .await
            .images
            .insert(path, (info.clone(), data));
        Ok(info)
    }

    async fn delete_image(&self, id: &str) -> Result<(), CmsError> {
        let mut state = self.state.write().await;
        let before = state.images.len();
        state.images.retain(|_, (info, _)| info.id != id);
        if state.images.len() == before {
            return Err(CmsError::not_found("Image not found"));
        }
        Ok(())
    }

    async fn fetch_image(&self, path: &str) -> Result<ImageData, CmsError> {
        self.state
            .read()
            .await
            .images
            .get(path.trim_start_matches('/'))
            .map(|(_, data)| data.clone())
            .ok_or_else(|| CmsError::not_found("Image not found"))
    }

    async fn api_key_status(&self) -> Result<ApiKeyStatus, CmsError> {
        Ok(self.state.read().await.api_key.clone())
    }

    async fn set_api_key_enabled(&self, enabled: bool) -> Result<ApiKeyStatus, CmsError> {
        let mut state = self.state.write().await;
        if enabled && state.api_key_secret.is_none() {
            return Err(CmsError::InvalidInput(
                "Generate an API key before enabling it".to_string(),
            ));
        }
        state.api_key.enabled = enabled;
        Ok(state.api_key.clone())
    }

    async fn generate_api_key(&self) -> Result<GeneratedApiKey, CmsError> {
        let random = gen_random_string(24).map_err(|e| CmsError::Transport(e.to_string()))?;
        let key = format!("blog_{random}");

        let mut state = self.state.write().await;
        state.api_key = ApiKeyStatus {
            enabled: true,
            key_preview: Some(format!("{}...", &key[..9])),
            created_at: Some(Utc::now()),
            last_used_at: None,
        };
        state.api_key_secret = Some(key.clone());

        Ok(GeneratedApiKey {
            key,
            status: state.api_key.clone(),
        })
    }

    async fn ai(&self, task: AiTask, _payload: Value) -> Result<Value, CmsError> {
        match task {
            AiTask::Status => Ok(json!({ "available": false })),
            _ => Err(CmsError::Status {
                status: 503,
                message: "AI service is not configured".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(title: &str, tags: &[&str]) -> ArticleInput {
        ArticleInput {
            title: Some(title.to_string()),
            tags: Some(tags.iter().map(|t| t.to_string()).collect()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_get_article() {
        let cms = MemoryCms::new();
        let created = cms.create_article(&input("Hello World", &["Rust"])).await.unwrap();

        assert_eq!(created.slug.as_deref(), Some("hello-world"));
        assert_eq!(created.status, ArticleStatus::Draft);
        assert_eq!(cms.get_article(&created.id).await.unwrap(), created);
        assert_eq!(cms.get_article("hello-world").await.unwrap().id, created.id);

        let tags = cms.list_tags().await.unwrap();
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].article_count, Some(1));
    }

    #[tokio::test]
    async fn test_create_requires_title() {
        let cms = MemoryCms::new();
        let err = cms.create_article(&ArticleInput::default()).await.unwrap_err();
        assert!(matches!(err, CmsError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_duplicate_slug_conflicts() {
        let cms = MemoryCms::new();
        cms.create_article(&input("Same", &[])).await.unwrap();
        let err = cms.create_article(&input("Same", &[])).await.unwrap_err();
        assert!(matches!(err, CmsError::Status { status: 409, .. }));
    }

    #[tokio::test]
    async fn test_publish_sets_published_at_once() {
        let cms = MemoryCms::new();
        let created = cms.create_article(&input("Post", &[])).await.unwrap();

        let published = cms
            .set_article_status(&created.id, ArticleStatus::Published)
            .await
            .unwrap();
        let first = published.published_at.unwrap();

        cms.set_article_status(&created.id, ArticleStatus::Draft)
            .await
            .unwrap();
        let republished = cms
            .set_article_status(&created.id, ArticleStatus::Published)
            .await
            .unwrap();
        assert_eq!(republished.published_at, Some(first));
    }

    #[tokio::test]
    async fn test_list_filters_and_pages() {
        let cms = MemoryCms::new();
        for i in 0..5 {
            let a = cms
                .create_article(&input(&format!("Post {i}"), &["rust"]))
                .await
                .unwrap();
            if i % 2 == 0 {
                cms.set_article_status(&a.id, ArticleStatus::Published)
                    .await
                    .unwrap();
            }
        }

        let published = cms
            .list_articles(&ArticleQuery {
                status: Some(ArticleStatus::Published),
                page_size: Some(2),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(published.total, 3);
        assert_eq!(published.items.len(), 2);

        let searched = cms
            .list_articles(&ArticleQuery {
                search: Some("post 3".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(searched.total, 1);

        let all = cms.list_all_published().await.unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_reorder_categories() {
        let cms = MemoryCms::new();
        let a = cms
            .create_category(&CategoryInput {
                name: Some("A".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let b = cms
            .create_category(&CategoryInput {
                name: Some("B".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let c = cms
            .create_category(&CategoryInput {
                name: Some("C".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let ordered = cms
            .reorder_categories(&[c.id.clone(), a.id.clone()])
            .await
            .unwrap();
        let ids: Vec<&str> = ordered.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec![c.id.as_str(), a.id.as_str(), b.id.as_str()]);

        let err = cms
            .reorder_categories(&["missing".to_string()])
            .await
            .unwrap_err();
        assert!(matches!(err, CmsError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_delete_tag_strips_articles() {
        let cms = MemoryCms::new();
        let article = cms.create_article(&input("Tagged", &["a", "b"])).await.unwrap();
        let tag = cms
            .list_tags()
            .await
            .unwrap()
            .into_iter()
            .find(|t| t.name == "a")
            .unwrap();

        cms.delete_tag(&tag.id).await.unwrap();
        assert_eq!(cms.get_article(&article.id).await.unwrap().tags, vec!["b"]);
        assert!(cms.delete_tag(&tag.id).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_image_upload_fetch_delete() {
        let cms = MemoryCms::new();
        let info = cms
            .upload_image(ImageUpload {
                filename: "My Photo.PNG".to_string(),
                content_type: "image/png".to_string(),
                bytes: vec![1, 2, 3],
            })
            .await
            .unwrap();
        assert_eq!(info.filename, "my-photo.png");
        assert_eq!(info.size, 3);

        let path = info.url.trim_start_matches("/images/");
        let data = cms.fetch_image(path).await.unwrap();
        assert_eq!(data.bytes, vec![1, 2, 3]);

        cms.delete_image(&info.id).await.unwrap();
        assert!(cms.fetch_image(path).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_image_upload_rejects_non_images() {
        let cms = MemoryCms::new();
        let err = cms
            .upload_image(ImageUpload {
                filename: "notes.txt".to_string(),
                content_type: "text/plain".to_string(),
                bytes: vec![1],
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CmsError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_api_key_lifecycle() {
        let cms = MemoryCms::new();
        assert!(!cms.api_key_status().await.unwrap().enabled);
        assert!(cms.set_api_key_enabled(true).await.is_err());

        let generated = cms.generate_api_key().await.unwrap();
        assert!(generated.key.starts_with("blog_"));
        assert!(generated.status.enabled);

        let disabled = cms.set_api_key_enabled(false).await.unwrap();
        assert!(!disabled.enabled);
        assert_eq!(disabled.key_preview, generated.status.key_preview);
    }

    #[tokio::test]
    async fn test_ai_is_unavailable() {
        let cms = MemoryCms::new();
        let status = cms.ai(AiTask::Status, Value::Null).await.unwrap();
        assert_eq!(status, json!({"available": false}));

        let err = cms.ai(AiTask::Outline, json!({})).await.unwrap_err();
        assert!(matches!(err, CmsError::Status { status: 503, .. }));
    }
}
