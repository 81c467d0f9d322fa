//! RON run profiles: which listing page to scan, what to match and where to save.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use docfetch_engine::{
    CodeLanguageRule, DocumentJob, FetchError, FetchSettings, MatchRule, PatternRule,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cli::FetchArgs;

pub const DEFAULT_LISTING_URL: &str =
    "https://unece.org/transport/vehicle-regulations-wp29/standards/addenda-1958-agreement-regulations-141-160";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read profile {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot parse profile {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchProfile {
    pub name: String,
    pub listing_url: String,
    pub code: String,
    pub marker: String,
    /// Overrides `code`/`marker` matching when set.
    pub pattern: Option<String>,
    pub label: String,
    pub destination: PathBuf,
    pub retries: u32,
    pub navigation_timeout_secs: u64,
    pub download_timeout_secs: u64,
}

impl Default for FetchProfile {
    fn default() -> Self {
        let settings = FetchSettings::default();
        Self {
            name: "UN-R155".to_string(),
            listing_url: DEFAULT_LISTING_URL.to_string(),
            code: "155".to_string(),
            marker: "e".to_string(),
            pattern: None,
            label: "UN-R155".to_string(),
            destination: PathBuf::from("downloads"),
            retries: 2,
            navigation_timeout_secs: settings.navigation_timeout.as_secs(),
            download_timeout_secs: settings.download_timeout.as_secs(),
        }
    }
}

impl FetchProfile {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    pub fn parse(content: &str) -> Result<Self, String> {
        ron::from_str(content).map_err(|err| err.to_string())
    }

    /// Defaults, then the `--config` file if given, then individual flags.
    pub fn resolve(args: &FetchArgs) -> Result<Self, ConfigError> {
        let mut profile = match &args.config {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        profile.apply_overrides(args);
        Ok(profile)
    }

    pub fn apply_overrides(&mut self, args: &FetchArgs) {
        if let Some(url) = &args.listing_url {
            self.listing_url = url.clone();
        }
        if let Some(code) = &args.code {
            self.code = code.clone();
        }
        if let Some(marker) = &args.marker {
            self.marker = marker.clone();
        }
        if let Some(pattern) = &args.pattern {
            self.pattern = Some(pattern.clone());
        }
        if let Some(label) = &args.label {
            self.label = label.clone();
        }
        if let Some(dest) = &args.dest {
            self.destination = dest.clone();
        }
        if let Some(retries) = args.retries {
            self.retries = retries;
        }
    }

    pub fn rule(&self) -> Result<Arc<dyn MatchRule>, FetchError> {
        let rule: Arc<dyn MatchRule> = match &self.pattern {
            Some(pattern) => Arc::new(PatternRule::new(pattern)?),
            None => Arc::new(CodeLanguageRule::new(&self.code, &self.marker)?),
        };
        Ok(rule)
    }

    pub fn job(&self) -> Result<DocumentJob, FetchError> {
        Ok(DocumentJob {
            listing_url: self.listing_url.clone(),
            rule: self.rule()?,
            label: self.label.clone(),
            destination: self.destination.clone(),
        })
    }

    pub fn settings(&self) -> FetchSettings {
        FetchSettings {
            navigation_timeout: Duration::from_secs(self.navigation_timeout_secs),
            download_timeout: Duration::from_secs(self.download_timeout_secs),
            ..FetchSettings::default()
        }
    }
}
