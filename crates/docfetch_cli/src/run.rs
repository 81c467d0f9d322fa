use anyhow::{Context, Result};
use docfetch_engine::{
    DownloadOutcome, EngineHandle, FetchError, FetchReport, FetchSettings, LogProgressSink,
    PageExpectations, PageSummary,
};
use docfetch_logging::{docfetch_info, docfetch_warn};

use crate::cli::{CheckArgs, FetchArgs};
use crate::config::FetchProfile;

/// Run `op` once, then up to `retries` more times while it fails.
///
/// Every attempt starts from scratch; the last error is returned.
pub fn with_retries<T>(
    retries: u32,
    what: &str,
    mut op: impl FnMut() -> Result<T, FetchError>,
) -> Result<T, FetchError> {
    let mut attempt = 0;
    loop {
        match op() {
            Ok(value) => return Ok(value),
            Err(err) if attempt < retries => {
                attempt += 1;
                docfetch_warn!("{} failed ({}); retry {}/{}", what, err, attempt, retries);
            }
            Err(err) => return Err(err),
        }
    }
}

pub fn run_fetch(args: &FetchArgs) -> Result<FetchReport> {
    let profile = FetchProfile::resolve(args)?;
    let job = profile
        .job()
        .with_context(|| format!("invalid match rule in profile {}", profile.name))?;
    docfetch_info!(
        "Fetching latest {} from {} into {:?}",
        profile.label,
        profile.listing_url,
        profile.destination
    );

    let engine = EngineHandle::new(profile.settings())?;
    let report = with_retries(profile.retries, "fetch", || {
        engine.fetch_latest(&job, &LogProgressSink)
    })
    .with_context(|| format!("fetching latest {} failed", profile.label))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        match report.outcome {
            DownloadOutcome::Downloaded { bytes } => {
                println!(
                    "downloaded {} ({bytes} bytes, sha256 {})",
                    report.file_path.display(),
                    report.sha256
                )
            }
            DownloadOutcome::AlreadyPresent { .. } => {
                println!("already present {}", report.file_path.display())
            }
        }
    }
    Ok(report)
}

pub fn run_check(args: &CheckArgs) -> Result<PageSummary> {
    let expectations = if args.has_expectations() {
        PageExpectations {
            title: args.title.clone(),
            heading: args.heading.clone(),
            contains: args.contains.clone(),
        }
    } else {
        PageExpectations::reference()
    };

    let engine = EngineHandle::new(FetchSettings::default())?;
    let summary = with_retries(args.retries, "page check", || {
        engine.check_page(&args.url, &expectations)
    })
    .with_context(|| format!("page check of {} failed", args.url))?;

    println!("ok {}", summary.url);
    Ok(summary)
}
