use std::fmt;
use std::path::PathBuf;

use chrono::NaiveDate;
use serde::Serialize;

/// Pipeline stages of a latest-document fetch, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Navigate,
    Extract,
    Filter,
    SelectMax,
    ShortCircuitCheck,
    Stream,
    Verify,
    Done,
}

/// A raw `(href, text)` pair scraped from a loaded page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedAnchor {
    pub url: String,
    pub text: String,
}

/// An anchor that passed the match rule and yielded a year/month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateLink {
    pub url: String,
    pub label: String,
    pub inferred_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedPage {
    pub requested_url: String,
    pub final_url: String,
    pub html: String,
    pub encoding_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DownloadOutcome {
    Downloaded { bytes: u64 },
    AlreadyPresent { bytes: u64 },
}

impl DownloadOutcome {
    pub fn bytes(&self) -> u64 {
        match self {
            DownloadOutcome::Downloaded { bytes } | DownloadOutcome::AlreadyPresent { bytes } => {
                *bytes
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FetchReport {
    pub file_path: PathBuf,
    pub candidate: CandidateLink,
    pub outcome: DownloadOutcome,
    /// Lower-case hex SHA-256 of the document on disk.
    pub sha256: String,
    pub candidates_seen: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    StageEntered(Stage),
    CandidateFound(CandidateLink),
    Selected(CandidateLink),
    Progress { bytes: u64 },
    Completed(Result<FetchReport, FailureKind>),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct FetchError {
    pub kind: FailureKind,
    pub message: String,
}

impl FetchError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    InvalidRule,
    NavigationTimeout,
    HttpStatus(u16),
    UnsupportedContentType { content_type: String },
    TooLarge { max_bytes: u64, actual: Option<u64> },
    Decode,
    NoMatchingDocument,
    Network,
    Io,
    DownloadVerificationFailed,
    AssertionFailed,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::InvalidRule => write!(f, "invalid match rule"),
            FailureKind::NavigationTimeout => write!(f, "navigation timeout"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::UnsupportedContentType { content_type } => {
                write!(f, "unsupported content type {content_type}")
            }
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Decode => write!(f, "decode error"),
            FailureKind::NoMatchingDocument => write!(f, "no matching document"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Io => write!(f, "io error"),
            FailureKind::DownloadVerificationFailed => write!(f, "download verification failed"),
            FailureKind::AssertionFailed => write!(f, "assertion failed"),
        }
    }
}
