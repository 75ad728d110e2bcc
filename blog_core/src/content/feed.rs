use chrono::Utc;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesText, Event};

use crate::cms::Article;
use crate::content::errors::ContentError;
use crate::content::site::SiteSettings;

/// RSS 2.0 document for the given articles, in the order supplied.
pub fn render_rss(site: &SiteSettings, articles: &[Article]) -> Result<String, ContentError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let feed_url = site.absolute_url("feed.xml");
    let last_build = articles
        .iter()
        .map(Article::display_date)
        .max()
        .unwrap_or_else(Utc::now);

    writer
        .create_element("rss")
        .with_attribute(("version", "2.0"))
        .with_attribute(("xmlns:atom", "http://www.w3.org/2005/Atom"))
        .write_inner_content(|w| {
            w.create_element("channel").write_inner_content(|w| {
                w.create_element("title")
                    .write_text_content(BytesText::new(&site.title))?;
                w.create_element("link")
                    .write_text_content(BytesText::new(&site.url))?;
                w.create_element("description")
                    .write_text_content(BytesText::new(&site.description))?;
                w.create_element("atom:link")
                    .with_attribute(("href", feed_url.as_str()))
                    .with_attribute(("rel", "self"))
                    .with_attribute(("type", "application/rss+xml"))
                    .write_empty()?;
                w.create_element("lastBuildDate")
                    .write_text_content(BytesText::new(&last_build.to_rfc2822()))?;

                for article in articles {
                    let link = site.absolute_url(&format!("posts/{}", article.route_key()));
                    w.create_element("item").write_inner_content(|w| {
                        w.create_element("title")
                            .write_text_content(BytesText::new(&article.title))?;
                        w.create_element("link")
                            .write_text_content(BytesText::new(&link))?;
                        w.create_element("guid")
                            .with_attribute(("isPermaLink", "true"))
                            .write_text_content(BytesText::new(&link))?;
                        w.create_element("description")
                            .write_text_content(BytesText::new(&article.description))?;
                        w.create_element("pubDate").write_text_content(BytesText::new(
                            &article.display_date().to_rfc2822(),
                        ))?;
                        for tag in &article.tags {
                            w.create_element("category")
                                .write_text_content(BytesText::new(tag))?;
                        }
                        Ok(())
                    })?;
                }
                Ok(())
            })?;
            Ok(())
        })?;

    Ok(String::from_utf8(writer.into_inner())?)
}
