use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::links::is_pdf_link;
use crate::matcher::MatchRule;
use crate::{CandidateLink, ExtractedAnchor};

static YEAR_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{4})[-/](\d{2})").expect("year/month pattern is valid"));

/// Year and month from the first `YYYY-MM` or `YYYY/MM` group in `url`, pinned to day 1.
///
/// Only the first group is considered; a month outside 01..=12 yields `None`.
pub fn infer_date(url: &str) -> Option<NaiveDate> {
    let caps = YEAR_MONTH.captures(url)?;
    let year = caps[1].parse::<i32>().ok()?;
    let month = caps[2].parse::<u32>().ok()?;
    // Month 00 or 13 is a malformed path, not December of the previous year or
    // January of the next; such links are dropped rather than rolled over.
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Anchors that are PDFs, satisfy `rule`, and carry a date, in document order.
pub fn build_candidates(anchors: &[ExtractedAnchor], rule: &dyn MatchRule) -> Vec<CandidateLink> {
    anchors
        .iter()
        .filter(|anchor| is_pdf_link(&anchor.url))
        .filter(|anchor| rule.matches(&anchor.url.to_lowercase()))
        .filter_map(|anchor| {
            Some(CandidateLink {
                url: anchor.url.clone(),
                label: anchor.text.clone(),
                inferred_date: infer_date(&anchor.url)?,
            })
        })
        .collect()
}

/// Newest candidate; on equal dates the earliest in the slice wins.
pub fn select_latest(candidates: &[CandidateLink]) -> Option<&CandidateLink> {
    candidates.iter().reduce(|latest, current| {
        if current.inferred_date > latest.inferred_date {
            current
        } else {
            latest
        }
    })
}
