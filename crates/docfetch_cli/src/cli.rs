//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use docfetch_engine::REFERENCE_PAGE_URL;

/// Download the newest edition of a regulation PDF from its listing page.
#[derive(Parser, Debug)]
#[command(name = "docfetch")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Also write the log to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Find the newest matching PDF on a listing page and download it if absent
    Fetch(FetchArgs),
    /// Load a page and assert its static text
    Check(CheckArgs),
}

#[derive(clap::Args, Debug, Default, Clone)]
pub struct FetchArgs {
    /// RON profile file; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Listing page holding the document links
    #[arg(long)]
    pub listing_url: Option<String>,

    /// Document code the link must contain, e.g. 155
    #[arg(long)]
    pub code: Option<String>,

    /// Language marker expected between the code and `.pdf`
    #[arg(long)]
    pub marker: Option<String>,

    /// Regex on the lower-cased link; replaces the code/marker rule
    #[arg(long)]
    pub pattern: Option<String>,

    /// Fixed label in the output file name
    #[arg(long)]
    pub label: Option<String>,

    /// Destination directory
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// Whole-run retry attempts after a failure (0-10)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=10))]
    pub retries: Option<u32>,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Page to load
    #[arg(long, default_value = REFERENCE_PAGE_URL)]
    pub url: String,

    /// Expected document title
    #[arg(long)]
    pub title: Option<String>,

    /// Expected text of the first h1
    #[arg(long)]
    pub heading: Option<String>,

    /// Text some paragraph must contain (repeatable)
    #[arg(long)]
    pub contains: Vec<String>,

    /// Whole-run retry attempts after a failure (0-10)
    #[arg(short, long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(0..=10))]
    pub retries: u32,
}

impl CheckArgs {
    pub fn has_expectations(&self) -> bool {
        self.title.is_some() || self.heading.is_some() || !self.contains.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_without_flags_leaves_everything_to_the_profile() {
        let args = Args::try_parse_from(["docfetch", "fetch"]).unwrap();
        let Command::Fetch(fetch) = args.command else {
            panic!("expected fetch");
        };
        assert!(fetch.config.is_none());
        assert!(fetch.code.is_none());
        assert!(fetch.retries.is_none());
        assert!(!fetch.json);
    }

    #[test]
    fn fetch_flags_are_parsed() {
        let args = Args::try_parse_from([
            "docfetch",
            "fetch",
            "--listing-url",
            "https://unece.org/list",
            "--code",
            "156",
            "--label",
            "UN-R156",
            "-d",
            "out",
            "-r",
            "0",
            "--json",
        ])
        .unwrap();
        let Command::Fetch(fetch) = args.command else {
            panic!("expected fetch");
        };
        assert_eq!(fetch.listing_url.as_deref(), Some("https://unece.org/list"));
        assert_eq!(fetch.code.as_deref(), Some("156"));
        assert_eq!(fetch.label.as_deref(), Some("UN-R156"));
        assert_eq!(fetch.dest, Some(PathBuf::from("out")));
        assert_eq!(fetch.retries, Some(0));
        assert!(fetch.json);
    }

    #[test]
    fn retries_above_limit_are_rejected() {
        let result = Args::try_parse_from(["docfetch", "fetch", "--retries", "11"]);
        assert!(result.is_err());
    }

    #[test]
    fn verbosity_flags_are_global() {
        let args = Args::try_parse_from(["docfetch", "check", "-vv", "--log-file", "run.log"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert_eq!(args.log_file, Some(PathBuf::from("run.log")));
    }

    #[test]
    fn check_defaults_to_reference_page() {
        let args = Args::try_parse_from(["docfetch", "check"]).unwrap();
        let Command::Check(check) = args.command else {
            panic!("expected check");
        };
        assert_eq!(check.url, REFERENCE_PAGE_URL);
        assert_eq!(check.retries, 2);
        assert!(!check.has_expectations());
    }

    #[test]
    fn check_collects_repeated_contains() {
        let args = Args::try_parse_from([
            "docfetch",
            "check",
            "--contains",
            "one",
            "--contains",
            "two",
        ])
        .unwrap();
        let Command::Check(check) = args.command else {
            panic!("expected check");
        };
        assert_eq!(check.contains, vec!["one".to_string(), "two".to_string()]);
        assert!(check.has_expectations());
    }

    #[test]
    fn missing_subcommand_is_an_error() {
        assert!(Args::try_parse_from(["docfetch"]).is_err());
    }
}
