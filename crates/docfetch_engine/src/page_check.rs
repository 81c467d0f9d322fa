use scraper::{Html, Selector};
use serde::Serialize;

use crate::links::collapse_whitespace;
use crate::{FailureKind, FetchError, PageLoader};

pub const REFERENCE_PAGE_URL: &str = "https://example.com/";

/// Static text a loaded page must show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageExpectations {
    /// Exact `<title>` text.
    pub title: Option<String>,
    /// Exact text of the first `h1`.
    pub heading: Option<String>,
    /// Each entry must appear in the text of some `p`.
    pub contains: Vec<String>,
}

impl PageExpectations {
    /// What the reference page is expected to say.
    pub fn reference() -> Self {
        Self {
            title: Some("Example Domain".to_string()),
            heading: Some("Example Domain".to_string()),
            contains: vec!["This domain is for use in illustrative examples".to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageSummary {
    pub url: String,
    pub title: Option<String>,
    pub heading: Option<String>,
}

/// Check parsed HTML against `expectations`. Whitespace runs compare as one space.
pub fn verify_page(
    url: &str,
    html: &str,
    expectations: &PageExpectations,
) -> Result<PageSummary, FetchError> {
    let doc = Html::parse_document(html);
    let title = first_text(&doc, "title");
    let heading = first_text(&doc, "h1");

    expect_equal("title", expectations.title.as_deref(), title.as_deref())?;
    expect_equal("h1", expectations.heading.as_deref(), heading.as_deref())?;

    if !expectations.contains.is_empty() {
        let paragraphs = all_text(&doc, "p");
        for needle in &expectations.contains {
            let needle = collapse_whitespace(needle);
            if !paragraphs.iter().any(|p| p.contains(&needle)) {
                return Err(FetchError::new(
                    FailureKind::AssertionFailed,
                    format!("no paragraph contains {needle:?}"),
                ));
            }
        }
    }

    Ok(PageSummary {
        url: url.to_string(),
        title,
        heading,
    })
}

pub async fn check_page(
    loader: &dyn PageLoader,
    url: &str,
    expectations: &PageExpectations,
) -> Result<PageSummary, FetchError> {
    let page = loader.load(url).await?;
    verify_page(&page.final_url, &page.html, expectations)
}

fn expect_equal(what: &str, expected: Option<&str>, actual: Option<&str>) -> Result<(), FetchError> {
    let Some(expected) = expected else {
        return Ok(());
    };
    let expected = collapse_whitespace(expected);
    if actual == Some(expected.as_str()) {
        return Ok(());
    }
    Err(FetchError::new(
        FailureKind::AssertionFailed,
        format!("expected {what} {expected:?}, found {actual:?}"),
    ))
}

fn first_text(doc: &Html, selector: &str) -> Option<String> {
    all_text(doc, selector).into_iter().next()
}

fn all_text(doc: &Html, selector: &str) -> Vec<String> {
    let Ok(sel) = Selector::parse(selector) else {
        return Vec::new();
    };
    doc.select(&sel)
        .map(|node| collapse_whitespace(&node.text().collect::<String>()))
        .collect()
}
