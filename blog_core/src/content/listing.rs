use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cms::Article;
use crate::content::site::SiteSettings;
use crate::utils::slugify;

/// Reader-supplied narrowing of the public article list
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct PostFilter {
    pub tag: Option<String>,
    pub category: Option<String>,
    pub q: Option<String>,
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl PostFilter {
    pub fn is_empty(&self) -> bool {
        non_blank(&self.tag).is_none()
            && non_blank(&self.category).is_none()
            && non_blank(&self.q).is_none()
    }

    /// Tag and category match by name or slug, ignoring case; `q` searches
    /// title, description and body.
    pub fn matches(&self, article: &Article) -> bool {
        if let Some(tag) = non_blank(&self.tag) {
            let wanted = slugify(tag);
            if !article
                .tags
                .iter()
                .any(|t| t.eq_ignore_ascii_case(tag) || slugify(t) == wanted)
            {
                return false;
            }
        }

        if let Some(category) = non_blank(&self.category) {
            if !article
                .category
                .as_deref()
                .is_some_and(|c| c.eq_ignore_ascii_case(category) || c == slugify(category))
            {
                return false;
            }
        }

        if let Some(q) = non_blank(&self.q) {
            let q = q.to_lowercase();
            if ![&article.title, &article.description, &article.content]
                .iter()
                .any(|field| field.to_lowercase().contains(&q))
            {
                return false;
            }
        }

        true
    }
}

/// Published articles matching `filter`, newest first.
pub fn published_posts(articles: Vec<Article>, filter: &PostFilter) -> Vec<Article> {
    let mut posts: Vec<Article> = articles
        .into_iter()
        .filter(|a| a.is_published() && filter.matches(a))
        .collect();
    posts.sort_by(|a, b| b.display_date().cmp(&a.display_date()));
    posts
}

/// Published article addressed by slug, falling back to id.
pub fn find_published<'a>(articles: &'a [Article], key: &str) -> Option<&'a Article> {
    let published = || articles.iter().filter(|a| a.is_published());
    published()
        .find(|a| a.slug.as_deref() == Some(key))
        .or_else(|| published().find(|a| a.id == key))
}

/// Listing entry shown to readers
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ArticleSummary {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category: Option<String>,
    pub cover_image: Option<String>,
    /// `display_date` rendered in the site timezone
    pub date: String,
    pub published_at: DateTime<Utc>,
}

impl ArticleSummary {
    pub fn new(article: &Article, site: &SiteSettings) -> Self {
        Self {
            id: article.id.clone(),
            slug: article.route_key().to_string(),
            title: article.title.clone(),
            description: article.description.clone(),
            tags: article.tags.clone(),
            category: article.category.clone(),
            cover_image: article.cover_image.clone(),
            date: site.format_date(article.display_date()),
            published_at: article.display_date(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PostDetail {
    #[serde(flatten)]
    pub summary: ArticleSummary,
    pub content: String,
    pub updated_at: DateTime<Utc>,
}

impl PostDetail {
    pub fn new(article: &Article, site: &SiteSettings) -> Self {
        Self {
            summary: ArticleSummary::new(article, site),
            content: article.content.clone(),
            updated_at: article.updated_at,
        }
    }
}
