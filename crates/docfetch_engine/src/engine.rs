use std::sync::Arc;

use crate::download::PayloadDownloader;
use crate::fetch::{FetchSettings, PageLoader, ReqwestPageLoader};
use crate::page_check::{check_page, PageExpectations, PageSummary};
use crate::pipeline::{DocumentJob, LatestDocumentFetcher};
use crate::{EngineEvent, FailureKind, FetchError, FetchReport, ProgressSink};

/// Blocking entry point: owns a tokio runtime and runs one operation at a time to completion.
pub struct EngineHandle {
    runtime: tokio::runtime::Runtime,
    loader: Arc<dyn PageLoader>,
    fetcher: LatestDocumentFetcher,
}

impl EngineHandle {
    pub fn new(settings: FetchSettings) -> Result<Self, FetchError> {
        let loader: Arc<dyn PageLoader> = Arc::new(ReqwestPageLoader::new(settings.clone()));
        Self::with_loader(settings, loader)
    }

    /// Use a custom page loader, e.g. one driving a headless browser.
    pub fn with_loader(
        settings: FetchSettings,
        loader: Arc<dyn PageLoader>,
    ) -> Result<Self, FetchError> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
            .map_err(|err| FetchError::new(FailureKind::Io, format!("tokio runtime: {err}")))?;
        let fetcher = LatestDocumentFetcher::new(loader.clone(), PayloadDownloader::new(settings));
        Ok(Self {
            runtime,
            loader,
            fetcher,
        })
    }

    pub fn fetch_latest(
        &self,
        job: &DocumentJob,
        sink: &dyn ProgressSink,
    ) -> Result<FetchReport, FetchError> {
        let result = self.runtime.block_on(self.fetcher.fetch_latest(job, sink));
        sink.emit(EngineEvent::Completed(
            result.clone().map_err(|err| err.kind),
        ));
        result
    }

    pub fn check_page(
        &self,
        url: &str,
        expectations: &PageExpectations,
    ) -> Result<PageSummary, FetchError> {
        self.runtime
            .block_on(check_page(self.loader.as_ref(), url, expectations))
    }
}
