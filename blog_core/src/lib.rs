//! blog_core - session, CSRF, pagination and CMS plumbing for the blog web tier
//!
//! The crate is framework-agnostic: it signs and verifies admin sessions,
//! derives CSRF tokens, computes pagination windows, talks to the CMS API and
//! renders the public feed and sitemap. HTTP wiring lives in `blog_axum`.

mod cms;
mod config;
mod content;
mod pagination;
mod session;
mod utils;

pub use cms::{
    AiTask, ApiKeyStatus, Article, ArticleInput, ArticleList, ArticleQuery, ArticleStatus,
    Category, CategoryInput, CmsApi, CmsError, GeneratedApiKey, HttpCms, ImageData, ImageInfo,
    ImageUpload, MemoryCms, Settings, Tag, TagInput,
};

pub use config::CMS_API_URL;

pub use content::{
    ArticleSummary, ContentError, PostDetail, PostFilter, SiteSettings, find_published,
    published_posts, render_rss, render_sitemap,
};

pub use pagination::{
    ELLIPSIS, Page, PageItem, PaginationError, page_window, paginate, total_pages,
};

pub use session::{
    CSRF_HEADER_NAME, CookieSettings, SameSite, SessionClaims, SessionCookie, SessionError,
    SessionSigner, cookie_value, hash_password, is_state_changing, verify_csrf_token,
    verify_password,
};

pub use utils::{UtilError, gen_random_string, slugify};
