use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::config::{FEED_LIMIT, PAGE_SIZE, SITE_DESCRIPTION, SITE_TIMEZONE, SITE_TITLE, SITE_URL};
use crate::content::errors::ContentError;
use crate::utils::trim_trailing_slash;

/// Public-facing site identity and listing knobs
#[derive(Debug, Clone)]
pub struct SiteSettings {
    /// Absolute base URL without trailing slash
    pub url: String,
    pub title: String,
    pub description: String,
    pub timezone: Tz,
    pub page_size: u32,
    pub feed_limit: usize,
}

impl SiteSettings {
    pub fn new(url: &str, title: &str, timezone: &str) -> Result<Self, ContentError> {
        let timezone = timezone
            .parse::<Tz>()
            .map_err(|_| ContentError::InvalidTimezone(timezone.to_string()))?;

        Ok(Self {
            url: trim_trailing_slash(url).to_string(),
            title: title.to_string(),
            description: String::new(),
            timezone,
            page_size: 10,
            feed_limit: 20,
        })
    }

    /// Settings from `SITE_*`, `PAGE_SIZE` and `FEED_LIMIT`.
    ///
    /// An unknown `SITE_TIMEZONE` falls back to UTC.
    pub fn from_env() -> Self {
        let timezone = SITE_TIMEZONE.parse::<Tz>().unwrap_or_else(|_| {
            tracing::warn!("Unknown SITE_TIMEZONE {:?}, using UTC", SITE_TIMEZONE.as_str());
            Tz::UTC
        });

        Self {
            url: trim_trailing_slash(SITE_URL.as_str()).to_string(),
            title: SITE_TITLE.clone(),
            description: SITE_DESCRIPTION.clone(),
            timezone,
            page_size: (*PAGE_SIZE).max(1),
            feed_limit: *FEED_LIMIT,
        }
    }

    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}/{}", self.url, path.trim_start_matches('/'))
    }

    /// Calendar date of `at` in the site timezone, as `YYYY-MM-DD`.
    pub fn format_date(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.timezone)
            .format("%Y-%m-%d")
            .to_string()
    }
}
