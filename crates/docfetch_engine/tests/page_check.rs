use docfetch_engine::{
    check_page, verify_page, FailureKind, FetchSettings, PageExpectations, ReqwestPageLoader,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const REFERENCE_HTML: &str = r#"<!doctype html>
<html>
<head>
    <title>Example Domain</title>
</head>
<body>
<div>
    <h1>Example Domain</h1>
    <p>This domain is for use in illustrative examples in documents. You may use this
    domain in literature without prior coordination or asking for permission.</p>
    <p><a href="https://www.iana.org/domains/example">More information...</a></p>
</div>
</body>
</html>"#;

#[test]
fn reference_expectations_hold_for_reference_page() {
    let summary = verify_page(
        "https://example.com/",
        REFERENCE_HTML,
        &PageExpectations::reference(),
    )
    .unwrap();

    assert_eq!(summary.title.as_deref(), Some("Example Domain"));
    assert_eq!(summary.heading.as_deref(), Some("Example Domain"));
}

#[test]
fn wrong_title_is_reported() {
    let expectations = PageExpectations {
        title: Some("Other Domain".to_string()),
        heading: None,
        contains: Vec::new(),
    };
    let err = verify_page("https://example.com/", REFERENCE_HTML, &expectations).unwrap_err();

    assert_eq!(err.kind, FailureKind::AssertionFailed);
    assert!(err.message.contains("Other Domain"));
    assert!(err.message.contains("Example Domain"));
}

#[test]
fn paragraph_text_is_matched_across_line_breaks() {
    let expectations = PageExpectations {
        title: None,
        heading: None,
        contains: vec!["You may use this domain in literature".to_string()],
    };
    assert!(verify_page("https://example.com/", REFERENCE_HTML, &expectations).is_ok());
}

#[test]
fn missing_paragraph_text_fails() {
    let expectations = PageExpectations {
        title: None,
        heading: None,
        contains: vec!["not on the page".to_string()],
    };
    let err = verify_page("https://example.com/", REFERENCE_HTML, &expectations).unwrap_err();
    assert_eq!(err.kind, FailureKind::AssertionFailed);
}

#[test]
fn missing_heading_fails() {
    let expectations = PageExpectations {
        title: None,
        heading: Some("Example Domain".to_string()),
        contains: Vec::new(),
    };
    let err = verify_page("https://x/", "<p>no heading</p>", &expectations).unwrap_err();
    assert_eq!(err.kind, FailureKind::AssertionFailed);
}

#[tokio::test]
async fn check_page_loads_then_verifies() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(REFERENCE_HTML, "text/html"))
        .mount(&server)
        .await;

    let loader = ReqwestPageLoader::new(FetchSettings::default());
    let url = format!("{}/", server.uri());
    let summary = check_page(&loader, &url, &PageExpectations::reference())
        .await
        .unwrap();

    assert_eq!(summary.url, url);
}
