use scraper::{Html, Selector};
use url::Url;

use crate::ExtractedAnchor;

/// Pulls `(href, text)` pairs out of a loaded page, resolving hrefs the way a browser does.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorExtractor;

impl AnchorExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Every anchor with a resolvable href, in document order.
    ///
    /// Relative hrefs resolve against the document's `<base href>` when present,
    /// otherwise against `page_url`.
    pub fn anchors(&self, html: &str, page_url: Option<&str>) -> Vec<ExtractedAnchor> {
        let document = Html::parse_document(html);
        let page_url = page_url.and_then(|url| Url::parse(url).ok());
        let base_url = document_base(&document, page_url.as_ref()).or(page_url);
        let Ok(selector) = Selector::parse("a[href]") else {
            return Vec::new();
        };

        document
            .select(&selector)
            .filter_map(|element| {
                let href = element.value().attr("href")?;
                let url = resolve_url(href, base_url.as_ref())?;
                Some(ExtractedAnchor {
                    url: url.into(),
                    text: collapse_whitespace(&element.text().collect::<String>()),
                })
            })
            .collect()
    }

    /// Anchors whose resolved address contains `.pdf`, compared case-insensitively.
    pub fn pdf_anchors(&self, html: &str, page_url: Option<&str>) -> Vec<ExtractedAnchor> {
        self.anchors(html, page_url)
            .into_iter()
            .filter(|anchor| is_pdf_link(&anchor.url))
            .collect()
    }
}

/// First `<base href>`, itself resolved against the page address.
fn document_base(document: &Html, page_url: Option<&Url>) -> Option<Url> {
    let selector = Selector::parse("base[href]").ok()?;
    let href = document.select(&selector).next()?.value().attr("href")?;
    resolve_url(href, page_url)
}

pub fn is_pdf_link(url: &str) -> bool {
    url.to_ascii_lowercase().contains(".pdf")
}

pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn resolve_url(reference: &str, base: Option<&Url>) -> Option<Url> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return None;
    }
    let lower = trimmed.to_ascii_lowercase();
    if lower.starts_with('#') || lower.starts_with("javascript:") || lower.starts_with("mailto:") {
        return None;
    }
    if let Ok(url) = Url::parse(trimmed) {
        return Some(url);
    }
    base.and_then(|base| base.join(trimmed).ok())
}
