// crates/todo_summary/src/config.rs

use std::path::PathBuf;

use anyhow::{anyhow, bail, Result};
use chrono::{Local, NaiveDate};
use clap::{Arg, ArgAction, ArgMatches, Command};

use inclusion_policy::{parse_list, FilterMode, InclusionPolicy};
use scan_todos::ScanOptions;
use todo_marker::MarkerPolicy;
use todo_tracker::{StoreLoadPolicy, DEFAULT_TRACKER_PATH};

/// Environment variable that pins the run date when `--date` is absent.
pub const DATE_ENV: &str = "TODO_SUMMARY_DATE";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Runtime configuration composed once from CLI + environment.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub root: PathBuf,
    pub tracker_path: PathBuf,
    pub inclusion: InclusionPolicy,
    pub scan: ScanOptions,
    pub store_policy: StoreLoadPolicy,
    /// `YYYY-MM-DD` given to every item first seen in this run.
    pub today: String,
    pub verbose: bool,
}

/// The command-line interface.
pub fn cli() -> Command {
    Command::new("todo_summary")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Tracks TODO[tag]: markers across runs and prints a Markdown summary")
        .arg(
            Arg::new("root")
                .long("root")
                .num_args(1)
                .default_value(".")
                .help("Root directory to scan"),
        )
        .arg(
            Arg::new("blacklist")
                .long("blacklist")
                .num_args(1)
                .help("Comma-separated list of base names/extensions/paths to ignore"),
        )
        .arg(
            Arg::new("whitelist")
                .long("whitelist")
                .num_args(1)
                .help("Comma-separated list of base names/extensions/paths to include (overrides blacklist)"),
        )
        .arg(
            Arg::new("mode")
                .long("mode")
                .num_args(1)
                .value_parser(["deny-list", "allow-list"])
                .default_value("deny-list")
                .help("Scan everything not denied, or only recognised source extensions"),
        )
        .arg(
            Arg::new("marker_policy")
                .long("marker-policy")
                .num_args(1)
                .value_parser(["anywhere", "comment-leader"])
                .default_value("anywhere")
                .help("Accept markers anywhere on a line, or only after a `// ` or `# ` leader"),
        )
        .arg(
            Arg::new("tracker")
                .long("tracker")
                .num_args(1)
                .default_value(DEFAULT_TRACKER_PATH)
                .help("Path of the JSON tracker file"),
        )
        .arg(
            Arg::new("on_corrupt_store")
                .long("on-corrupt-store")
                .num_args(1)
                .value_parser(["reset", "fail"])
                .default_value("reset")
                .help("Start empty or abort when the tracker cannot be read"),
        )
        .arg(
            Arg::new("skip_unreadable")
                .long("skip-unreadable")
                .help("Report unreadable files instead of aborting the scan")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("date")
                .long("date")
                .num_args(1)
                .help("Date (YYYY-MM-DD) recorded for newly found TODOs [default: today]"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose logging")
                .action(ArgAction::SetTrue),
        )
}

impl AppConfig {
    /// Builds the configuration from parsed arguments, consulting
    /// `TODO_SUMMARY_DATE` when `--date` was not given.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self> {
        Self::from_matches_with_env(matches, std::env::var(DATE_ENV).ok())
    }

    fn from_matches_with_env(matches: &ArgMatches, env_date: Option<String>) -> Result<Self> {
        let get = |id: &str| matches.get_one::<String>(id).map(String::as_str);

        let mode = get("mode")
            .and_then(FilterMode::from_name)
            .ok_or_else(|| anyhow!("invalid --mode"))?;
        let marker_policy = get("marker_policy")
            .and_then(MarkerPolicy::from_name)
            .ok_or_else(|| anyhow!("invalid --marker-policy"))?;
        let store_policy = get("on_corrupt_store")
            .and_then(StoreLoadPolicy::from_name)
            .ok_or_else(|| anyhow!("invalid --on-corrupt-store"))?;

        // Blacklist first, whitelist second: a name on both ends up scanned.
        let inclusion = InclusionPolicy::new(mode)
            .with_blacklist(get("blacklist").map(parse_list).unwrap_or_default())
            .with_whitelist(get("whitelist").map(parse_list).unwrap_or_default());

        let today = resolve_date(get("date"), env_date.as_deref())?;

        Ok(Self {
            root: PathBuf::from(get("root").unwrap_or(".")),
            tracker_path: PathBuf::from(get("tracker").unwrap_or(DEFAULT_TRACKER_PATH)),
            inclusion,
            scan: ScanOptions {
                marker_policy,
                skip_unreadable: matches.get_flag("skip_unreadable"),
            },
            store_policy,
            today,
            verbose: matches.get_flag("verbose"),
        })
    }
}

/// Picks the run date: the flag, then the environment, then today's local
/// date. Explicit dates must be valid calendar dates in `YYYY-MM-DD` form.
pub fn resolve_date(flag: Option<&str>, env: Option<&str>) -> Result<String> {
    match flag.or(env).map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => {
            let date = NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .map_err(|e| anyhow!("invalid date {:?}: {}", raw, e))?;
            let normalised = date.format(DATE_FORMAT).to_string();
            if normalised != raw {
                bail!("invalid date {:?}: expected YYYY-MM-DD", raw);
            }
            Ok(normalised)
        }
        None => Ok(Local::now().date_naive().format(DATE_FORMAT).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inclusion_policy::Decision;

    fn config_from(args: &[&str]) -> Result<AppConfig> {
        let mut argv = vec!["todo_summary"];
        argv.extend_from_slice(args);
        let matches = cli().try_get_matches_from(argv)?;
        AppConfig::from_matches_with_env(&matches, None)
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&["--date", "2024-01-01"]).unwrap();
        assert_eq!(config.root, PathBuf::from("."));
        assert_eq!(config.tracker_path, PathBuf::from("todo_tracker.json"));
        assert_eq!(config.inclusion, InclusionPolicy::default());
        assert_eq!(config.scan.marker_policy, MarkerPolicy::Anywhere);
        assert!(!config.scan.skip_unreadable);
        assert_eq!(config.store_policy, StoreLoadPolicy::Reset);
        assert_eq!(config.today, "2024-01-01");
        assert!(!config.verbose);
    }

    #[test]
    fn test_blacklist_and_whitelist_build_policy() {
        let config = config_from(&[
            "--blacklist",
            " vendor, .log ,,dist/",
            "--whitelist",
            ".action-tmp, vendor",
        ])
        .unwrap();
        let entries: Vec<&str> = config.inclusion.deny_entries().collect();
        assert_eq!(entries, vec![".log", "dist/"]);
        assert_eq!(config.inclusion.decide("vendor", true), Decision::Accept);
        assert_eq!(config.inclusion.decide("dist/app.js", false), Decision::SkipEntry);
    }

    #[test]
    fn test_variant_flags() {
        let config = config_from(&[
            "--mode",
            "allow-list",
            "--marker-policy",
            "comment-leader",
            "--on-corrupt-store",
            "fail",
            "--skip-unreadable",
            "--tracker",
            "state/todos.json",
            "--verbose",
        ])
        .unwrap();
        assert_eq!(config.inclusion.mode(), FilterMode::AllowList);
        assert_eq!(config.scan.marker_policy, MarkerPolicy::CommentLeader);
        assert_eq!(config.store_policy, StoreLoadPolicy::Fail);
        assert!(config.scan.skip_unreadable);
        assert_eq!(config.tracker_path, PathBuf::from("state/todos.json"));
        assert!(config.verbose);
    }

    #[test]
    fn test_unknown_mode_is_rejected_by_parser() {
        assert!(config_from(&["--mode", "both"]).is_err());
    }

    #[test]
    fn test_resolve_date_precedence() {
        assert_eq!(resolve_date(Some("2024-02-29"), Some("2020-01-01")).unwrap(), "2024-02-29");
        assert_eq!(resolve_date(None, Some("2020-01-01")).unwrap(), "2020-01-01");
        let today = resolve_date(None, None).unwrap();
        assert_eq!(today.len(), 10);
        assert!(NaiveDate::parse_from_str(&today, DATE_FORMAT).is_ok());
    }

    #[test]
    fn test_resolve_date_rejects_bad_input() {
        assert!(resolve_date(Some("2023-02-29"), None).is_err());
        assert!(resolve_date(Some("2024-1-5"), None).is_err());
        assert!(resolve_date(Some("yesterday"), None).is_err());
    }
}
