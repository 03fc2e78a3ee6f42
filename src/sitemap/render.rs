//! Sitemap XML rendering and parsing (sitemaps.org 0.9)

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use super::url::{SitemapIndexEntry, SitemapUrl};
use crate::errors::{Result, RoutemapError};

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

fn xml_err<E: std::fmt::Display>(e: E) -> RoutemapError {
    RoutemapError::render(e.to_string())
}

type XmlWriter = Writer<Vec<u8>>;

fn write_text_element(writer: &mut XmlWriter, name: &str, text: &str) -> Result<()> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(xml_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(xml_err)?;
    Ok(())
}

fn open_document(root: &str) -> Result<XmlWriter> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(xml_err)?;
    let mut start = BytesStart::new(root);
    start.push_attribute(("xmlns", SITEMAP_NS));
    writer.write_event(Event::Start(start)).map_err(xml_err)?;
    Ok(writer)
}

fn close_document(mut writer: XmlWriter, root: &str) -> Result<String> {
    writer
        .write_event(Event::End(BytesEnd::new(root)))
        .map_err(xml_err)?;
    let mut body = String::from_utf8(writer.into_inner())?;
    body.push('\n');
    Ok(body)
}

pub fn format_priority(priority: f32) -> String {
    format!("{:.1}", priority)
}

/// `<urlset>` 至少包含一个 `<url>`，空列表是调用方的错误
pub fn render_urlset(urls: &[SitemapUrl]) -> Result<String> {
    if urls.is_empty() {
        return Err(RoutemapError::render("urlset must contain at least one <url>"));
    }
    let mut writer = open_document("urlset")?;
    for url in urls {
        writer
            .write_event(Event::Start(BytesStart::new("url")))
            .map_err(xml_err)?;
        write_text_element(&mut writer, "loc", &url.loc)?;
        if let Some(lastmod) = url.lastmod {
            write_text_element(&mut writer, "lastmod", &lastmod.format("%Y-%m-%d").to_string())?;
        }
        write_text_element(&mut writer, "changefreq", url.changefreq.as_ref())?;
        write_text_element(&mut writer, "priority", &format_priority(url.priority))?;
        writer
            .write_event(Event::End(BytesEnd::new("url")))
            .map_err(xml_err)?;
    }
    close_document(writer, "urlset")
}

pub fn render_sitemap_index(entries: &[SitemapIndexEntry]) -> Result<String> {
    let mut writer = open_document("sitemapindex")?;
    for entry in entries {
        writer
            .write_event(Event::Start(BytesStart::new("sitemap")))
            .map_err(xml_err)?;
        write_text_element(&mut writer, "loc", &entry.loc)?;
        if let Some(lastmod) = entry.lastmod {
            write_text_element(&mut writer, "lastmod", &lastmod.format("%Y-%m-%d").to_string())?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("sitemap")))
            .map_err(xml_err)?;
    }
    close_document(writer, "sitemapindex")
}

/// 最小可用的 urlset，不经过 writer，不会失败
pub fn render_minimal(loc: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"{}\">\n  <url>\n    <loc>{}</loc>\n    <changefreq>daily</changefreq>\n    <priority>0.8</priority>\n  </url>\n</urlset>\n",
        SITEMAP_NS,
        escape(loc)
    )
}

/// 解析得到的 `<url>` 或 `<sitemap>` 条目
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedEntry {
    pub loc: String,
    pub lastmod: Option<String>,
    pub changefreq: Option<String>,
    pub priority: Option<f32>,
}

/// 解析 urlset 或 sitemapindex，按文档顺序返回条目
pub fn parse_entries(xml: &str) -> Result<Vec<ParsedEntry>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);
    let mut buf = Vec::new();

    let mut entries = Vec::new();
    let mut current: Option<ParsedEntry> = None;
    let mut current_tag = String::new();

    loop {
        match reader.read_event_into(&mut buf).map_err(xml_err)? {
            Event::Start(e) => {
                let name = String::from_utf8_lossy(e.name().as_ref()).to_string();
                if name == "url" || name == "sitemap" {
                    current = Some(ParsedEntry::default());
                }
                current_tag = name;
            }
            Event::Text(e) => {
                let text = e.unescape().map_err(xml_err)?.trim().to_string();
                if let Some(entry) = current.as_mut() {
                    match current_tag.as_str() {
                        "loc" => entry.loc = text,
                        "lastmod" => entry.lastmod = Some(text),
                        "changefreq" => entry.changefreq = Some(text),
                        "priority" => {
                            entry.priority = Some(text.parse().map_err(|_| {
                                RoutemapError::render(format!("invalid priority '{}'", text))
                            })?)
                        }
                        _ => {}
                    }
                }
            }
            Event::End(e) => {
                let name = e.name();
                if matches!(name.as_ref(), b"url" | b"sitemap") {
                    if let Some(entry) = current.take() {
                        entries.push(entry);
                    }
                }
                current_tag.clear();
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    Ok(entries)
}
