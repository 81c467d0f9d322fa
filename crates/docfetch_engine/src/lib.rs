//! Docfetch engine: listing page loading, document selection and download.
mod decode;
mod download;
mod engine;
mod fetch;
mod filename;
mod links;
mod matcher;
mod page_check;
mod persist;
mod pipeline;
mod progress;
mod select;
mod types;

pub use decode::{decode_page, DecodeError, DecodedPage};
pub use download::PayloadDownloader;
pub use engine::EngineHandle;
pub use fetch::{FetchSettings, PageLoader, ReqwestPageLoader, DEFAULT_USER_AGENT};
pub use filename::document_filename;
pub use links::{is_pdf_link, AnchorExtractor};
pub use matcher::{CodeLanguageRule, MatchRule, PatternRule};
pub use page_check::{
    check_page, verify_page, PageExpectations, PageSummary, REFERENCE_PAGE_URL,
};
pub use persist::{
    ensure_output_dir, existing_file_len, hash_file, verify_download, PartialDownload,
    PersistError, PersistedFile, VerifyError,
};
pub use pipeline::{DocumentJob, LatestDocumentFetcher};
pub use progress::{LogProgressSink, ProgressSink};
pub use select::{build_candidates, infer_date, select_latest};
pub use types::{
    CandidateLink, DownloadOutcome, EngineEvent, ExtractedAnchor, FailureKind, FetchError,
    FetchReport, LoadedPage, Stage,
};
