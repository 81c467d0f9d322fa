use docfetch_logging::{docfetch_debug, docfetch_info, docfetch_trace, docfetch_warn};

use crate::EngineEvent;

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

/// Forwards events to the global logger.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgressSink;

impl ProgressSink for LogProgressSink {
    fn emit(&self, event: EngineEvent) {
        match event {
            EngineEvent::StageEntered(stage) => docfetch_debug!("Stage {:?}", stage),
            EngineEvent::CandidateFound(candidate) => docfetch_info!(
                "Candidate {} text={:?} date={}",
                candidate.url,
                candidate.label,
                candidate.inferred_date
            ),
            EngineEvent::Selected(candidate) => docfetch_info!(
                "Latest document {} dated {}",
                candidate.url,
                candidate.inferred_date.format("%Y-%m")
            ),
            EngineEvent::Progress { bytes } => docfetch_trace!("Downloaded {} bytes", bytes),
            EngineEvent::Completed(Ok(report)) => docfetch_info!(
                "Done: {:?} ({} bytes)",
                report.file_path,
                report.outcome.bytes()
            ),
            EngineEvent::Completed(Err(kind)) => docfetch_warn!("Fetch failed: {}", kind),
        }
    }
}
