use std::path::Path;

use docfetch_logging::{docfetch_debug, docfetch_info};
use futures_util::StreamExt;
use reqwest::header::USER_AGENT;

use crate::fetch::{map_download_error, FetchSettings};
use crate::persist::{verify_download, PartialDownload, PersistError, PersistedFile};
use crate::{EngineEvent, FailureKind, FetchError, ProgressSink, Stage};

/// Streams a document body to disk and checks the result.
#[derive(Debug, Clone)]
pub struct PayloadDownloader {
    settings: FetchSettings,
}

impl PayloadDownloader {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    /// Download `url` to `target`, then verify the file is non-empty.
    ///
    /// An empty body never reaches `target`.
    pub async fn download(
        &self,
        url: &str,
        target: &Path,
        sink: &dyn ProgressSink,
    ) -> Result<PersistedFile, FetchError> {
        let parsed = reqwest::Url::parse(url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, format!("{url}: {err}")))?;
        let dir = target.parent().unwrap_or_else(|| Path::new("."));

        sink.emit(EngineEvent::StageEntered(Stage::Stream));
        let client = self.settings.build_client(self.settings.download_timeout)?;
        let response = client
            .get(parsed)
            .header(USER_AGENT, &self.settings.user_agent)
            .send()
            .await
            .map_err(map_download_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                format!("{url} answered {status}"),
            ));
        }

        let mut partial = PartialDownload::create_in(dir).map_err(persist_error)?;
        docfetch_debug!("Streaming {} via {:?}", url, partial.temp_path());

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            // Returning here drops `partial`, which deletes the temp file.
            let chunk = chunk.map_err(|err| {
                docfetch_debug!("Discarding partial download of {} after stream error", url);
                map_download_error(err)
            })?;
            let bytes = partial.write_chunk(&chunk).await.map_err(persist_error)?;
            sink.emit(EngineEvent::Progress { bytes });
        }

        sink.emit(EngineEvent::StageEntered(Stage::Verify));
        if partial.written() == 0 {
            return Err(FetchError::new(
                FailureKind::DownloadVerificationFailed,
                format!("{url} returned an empty body"),
            ));
        }

        let persisted = partial.finish(target).await.map_err(persist_error)?;
        docfetch_info!(
            "Wrote {} bytes to {:?} (sha256 {})",
            persisted.bytes,
            target,
            persisted.sha256
        );

        let bytes = verify_download(target).map_err(|err| {
            FetchError::new(FailureKind::DownloadVerificationFailed, err.to_string())
        })?;
        Ok(PersistedFile { bytes, ..persisted })
    }
}

fn persist_error(err: PersistError) -> FetchError {
    FetchError::new(FailureKind::Io, err.to_string())
}
