use anyhow::{Context, Result};

use crate::http_client::{fetch_text, http_client_with_timeout};
use crate::model::Article;

pub trait NewsSource {
    fn articles(&self) -> Result<Vec<Article>>;
}

#[derive(Debug, Clone)]
pub struct RssFeed {
    pub url: String,
    pub timeout_secs: u64,
}

impl RssFeed {
    pub fn new(url: &str, timeout_secs: u64) -> Self {
        Self {
            url: url.trim().to_string(),
            timeout_secs,
        }
    }
}

impl NewsSource for RssFeed {
    fn articles(&self) -> Result<Vec<Article>> {
        let client = http_client_with_timeout(self.timeout_secs)?;
        let body = fetch_text(client, &self.url)
            .with_context(|| format!("rss request failed: {}", self.url))?;
        Ok(parse_rss(&body))
    }
}

/// Pull (pubDate, link, title) out of every `<item>` of an RSS 2.0 document.
/// Items without a link or title are dropped.
pub fn parse_rss(xml: &str) -> Vec<Article> {
    let mut out = Vec::new();
    let mut search_from = 0;

    while let Some(start) = find_item_open(&xml[search_from..]) {
        let item_start = search_from + start;
        let Some(end_offset) = xml[item_start..].find("</item>") else {
            break;
        };
        let item = &xml[item_start..item_start + end_offset];
        search_from = item_start + end_offset + "</item>".len();

        let title = tag_text(item, "title").unwrap_or_default();
        let link = tag_text(item, "link").unwrap_or_default();
        if title.is_empty() || link.is_empty() {
            continue;
        }
        let published = tag_text(item, "pubDate").unwrap_or_default();
        out.push(Article {
            published,
            link,
            title,
        });
    }

    out
}

// Matches `<item>` and `<item attr=...>` but not `<itemref>`.
fn find_item_open(xml: &str) -> Option<usize> {
    let mut from = 0;
    while let Some(pos) = xml[from..].find("<item") {
        let at = from + pos;
        match xml[at + "<item".len()..].chars().next() {
            Some('>') | Some(' ') | Some('\t') | Some('\n') | Some('\r') => return Some(at),
            _ => from = at + "<item".len(),
        }
    }
    None
}

fn tag_text(block: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}");
    let close = format!("</{tag}>");
    let start = block.find(&open)?;
    let content_start = start + block[start..].find('>')? + 1;
    let end = content_start + block[content_start..].find(&close)?;
    let raw = block[content_start..end].trim();
    let raw = raw
        .strip_prefix("<![CDATA[")
        .and_then(|s| s.strip_suffix("]]>"))
        .unwrap_or(raw);
    Some(xml_decode(raw.trim()))
}

fn xml_decode(s: &str) -> String {
    s.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_entities_and_cdata() {
        let xml = r#"<rss><channel><title>Feed</title>
            <item><title><![CDATA[Radicals & Rush]]></title>
            <link>http://example.com/a?x=1&amp;y=2</link>
            <pubDate>Sat, 12 Apr 2014 19:00:00 GMT</pubDate></item>
        </channel></rss>"#;
        let items = parse_rss(xml);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Radicals & Rush");
        assert_eq!(items[0].link, "http://example.com/a?x=1&y=2");
        assert_eq!(items[0].published, "Sat, 12 Apr 2014 19:00:00 GMT");
    }
}
