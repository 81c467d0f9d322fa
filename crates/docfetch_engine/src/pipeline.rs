use std::path::PathBuf;
use std::sync::Arc;

use docfetch_logging::docfetch_info;

use crate::download::PayloadDownloader;
use crate::filename::document_filename;
use crate::links::AnchorExtractor;
use crate::matcher::MatchRule;
use crate::persist::{existing_file_len, hash_file};
use crate::select::{build_candidates, select_latest};
use crate::{
    DownloadOutcome, EngineEvent, FailureKind, FetchError, FetchReport, PageLoader, ProgressSink,
    Stage,
};

/// What to fetch and where to put it.
#[derive(Clone)]
pub struct DocumentJob {
    pub listing_url: String,
    pub rule: Arc<dyn MatchRule>,
    /// Fixed document label used in the output name, e.g. `UN-R155`.
    pub label: String,
    pub destination: PathBuf,
}

/// Navigate → Extract → Filter → SelectMax → ShortCircuitCheck → Stream → Verify.
pub struct LatestDocumentFetcher {
    loader: Arc<dyn PageLoader>,
    downloader: PayloadDownloader,
    extractor: AnchorExtractor,
}

impl LatestDocumentFetcher {
    pub fn new(loader: Arc<dyn PageLoader>, downloader: PayloadDownloader) -> Self {
        Self {
            loader,
            downloader,
            extractor: AnchorExtractor::new(),
        }
    }

    pub async fn fetch_latest(
        &self,
        job: &DocumentJob,
        sink: &dyn ProgressSink,
    ) -> Result<FetchReport, FetchError> {
        sink.emit(EngineEvent::StageEntered(Stage::Navigate));
        let page = self.loader.load(&job.listing_url).await?;
        docfetch_info!("Listing page loaded: {}", page.final_url);

        sink.emit(EngineEvent::StageEntered(Stage::Extract));
        let anchors = self.extractor.pdf_anchors(&page.html, Some(&page.final_url));

        sink.emit(EngineEvent::StageEntered(Stage::Filter));
        let candidates = build_candidates(&anchors, job.rule.as_ref());
        docfetch_info!(
            "{} of {} pdf links match {}",
            candidates.len(),
            anchors.len(),
            job.rule.describe()
        );
        for candidate in &candidates {
            sink.emit(EngineEvent::CandidateFound(candidate.clone()));
        }

        sink.emit(EngineEvent::StageEntered(Stage::SelectMax));
        let latest = select_latest(&candidates).cloned().ok_or_else(|| {
            FetchError::new(
                FailureKind::NoMatchingDocument,
                format!(
                    "no pdf link on {} matches {}",
                    page.final_url,
                    job.rule.describe()
                ),
            )
        })?;
        sink.emit(EngineEvent::Selected(latest.clone()));

        sink.emit(EngineEvent::StageEntered(Stage::ShortCircuitCheck));
        let file_name = document_filename(latest.inferred_date, &job.label);
        let file_path = job.destination.join(&file_name);

        let (outcome, sha256) = match existing_file_len(&file_path) {
            Some(bytes) => {
                docfetch_info!("{} already exists; skipping download", file_name);
                let sha256 = hash_file(&file_path)
                    .map_err(|err| FetchError::new(FailureKind::Io, err.to_string()))?;
                (DownloadOutcome::AlreadyPresent { bytes }, sha256)
            }
            None => {
                let persisted = self
                    .downloader
                    .download(&latest.url, &file_path, sink)
                    .await?;
                (
                    DownloadOutcome::Downloaded {
                        bytes: persisted.bytes,
                    },
                    persisted.sha256,
                )
            }
        };

        sink.emit(EngineEvent::StageEntered(Stage::Done));
        Ok(FetchReport {
            file_path,
            candidate: latest,
            outcome,
            sha256,
            candidates_seen: candidates.len(),
        })
    }
}
