use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};

use crate::cms::{Article, Category, Tag};
use crate::content::errors::ContentError;
use crate::content::site::SiteSettings;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Sitemap listing the home page, every published article, and each tag and category page.
pub fn render_sitemap(
    site: &SiteSettings,
    articles: &[Article],
    tags: &[Tag],
    categories: &[Category],
) -> Result<String, ContentError> {
    let mut entries: Vec<(String, Option<String>)> = vec![(site.absolute_url(""), None)];
    entries.extend(articles.iter().filter(|a| a.is_published()).map(|a| {
        (
            site.absolute_url(&format!("posts/{}", a.route_key())),
            Some(a.updated_at.format("%Y-%m-%d").to_string()),
        )
    }));
    entries.extend(
        tags.iter()
            .map(|t| (site.absolute_url(&format!("tags/{}", t.slug)), None)),
    );
    entries.extend(
        categories
            .iter()
            .map(|c| (site.absolute_url(&format!("categories/{}", c.slug)), None)),
    );

    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
    writer
        .create_element("urlset")
        .with_attribute(("xmlns", SITEMAP_NS))
        .write_inner_content(|w| {
            for (loc, lastmod) in &entries {
                w.create_element("url").write_inner_content(|w| {
                    w.create_element("loc")
                        .write_text_content(BytesText::new(loc))?;
                    if let Some(lastmod) = lastmod {
                        w.create_element("lastmod")
                            .write_text_content(BytesText::new(lastmod))?;
                    }
                    Ok(())
                })?;
            }
            Ok(())
        })?;

    Ok(String::from_utf8(writer.into_inner())?)
}
