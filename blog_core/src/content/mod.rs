mod errors;
mod feed;
mod listing;
mod site;
mod sitemap;

pub use errors::ContentError;
pub use feed::render_rss;
pub use listing::{ArticleSummary, PostDetail, PostFilter, find_published, published_posts};
pub use site::SiteSettings;
pub use sitemap::render_sitemap;
