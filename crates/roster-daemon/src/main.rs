use anyhow::Context;
use clap::{Arg, ArgAction, ArgMatches, Command, value_parser};
use roster_audit::tree_lines;
use roster_daemon::{
    ConsoleNotifier, FetchSettings, StaticRosterSource, ValidationError, ValidationSummary, Validator,
};
use roster_model::AuditConfig;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Exit code for a clean hierarchy
const EXIT_CLEAN: i32 = 0;
/// Exit code when the audit reported violations
const EXIT_VIOLATIONS: i32 = 2;

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Path to the chat hierarchy config (JSON, or YAML by extension)")
}

fn cli() -> Command {
    Command::new("roster-check")
        .version(roster_daemon::VERSION)
        .about("Chat hierarchy membership auditor")
        .subcommand_required(true)
        .arg(
            Arg::new("log-json")
                .long("log-json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Emit logs as JSON lines"),
        )
        .subcommand(
            Command::new("validate")
                .about("Fetch rosters, audit the hierarchy and deliver the report")
                .arg(config_arg())
                .arg(
                    Arg::new("roster")
                        .long("roster")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Path to the roster file"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Print violations as JSON"),
                )
                .arg(
                    Arg::new("concurrency")
                        .long("concurrency")
                        .default_value("4")
                        .value_parser(value_parser!(usize))
                        .help("Maximum roster fetches in flight"),
                )
                .arg(
                    Arg::new("timeout-secs")
                        .long("timeout-secs")
                        .default_value("30")
                        .value_parser(value_parser!(u64))
                        .help("Deadline for fetching one chat roster"),
                ),
        )
        .subcommand(
            Command::new("lines")
                .about("Print every root-to-leaf hierarchy line")
                .arg(config_arg()),
        )
        .subcommand(
            Command::new("aliases")
                .about("Print all chat aliases and help contacts")
                .arg(config_arg()),
        )
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn load_config(args: &ArgMatches) -> anyhow::Result<AuditConfig> {
    let path = args
        .get_one::<PathBuf>("config")
        .context("missing --config")?;
    AuditConfig::load(path)
        .map_err(ValidationError::from)
        .with_context(|| format!("loading config {}", path.display()))
}

/// What `validate` writes to stdout
///
/// With `json` only the violation list is printed. Otherwise the report is
/// printed only when no notification target received it.
fn stdout_payload(
    summary: &ValidationSummary,
    json: bool,
    has_targets: bool,
) -> serde_json::Result<Option<String>> {
    if json {
        return serde_json::to_string_pretty(summary.outcome.violations()).map(Some);
    }
    if has_targets {
        return Ok(None);
    }
    Ok(summary.report.clone())
}

/// Process exit code for a finished run
fn exit_code(summary: &ValidationSummary) -> i32 {
    if summary.is_clean() {
        EXIT_CLEAN
    } else {
        EXIT_VIOLATIONS
    }
}

async fn validate(args: &ArgMatches) -> anyhow::Result<i32> {
    let config = load_config(args)?;
    let roster_path = args
        .get_one::<PathBuf>("roster")
        .context("missing --roster")?;
    let source = StaticRosterSource::load(roster_path)
        .with_context(|| format!("loading rosters {}", roster_path.display()))?;

    let json = args.get_flag("json");
    let concurrency = args.get_one::<usize>("concurrency").copied().unwrap_or(4);
    let timeout_secs = args.get_one::<u64>("timeout-secs").copied().unwrap_or(30);
    let settings = FetchSettings::default()
        .with_concurrency(concurrency)
        .with_timeout(Duration::from_secs(timeout_secs));

    let notifier = if json {
        ConsoleNotifier::stderr()
    } else {
        ConsoleNotifier::stdout()
    };
    let has_targets = !config.notification().targets.is_empty();

    let summary = Validator::new(config, source, notifier)
        .with_fetch_settings(settings)
        .run()
        .await
        .context("membership validation failed")?;

    if let Some(out) =
        stdout_payload(&summary, json, has_targets).context("serializing violations")?
    {
        println!("{out}");
    }

    tracing::info!(
        "Validation finished: {} ancestor and {} child coverage violations, {} notifications",
        summary.outcome.ancestor_count(),
        summary.outcome.child_coverage_count(),
        summary.notifications_sent
    );
    Ok(exit_code(&summary))
}

fn print_lines(args: &ArgMatches) -> anyhow::Result<()> {
    let config = load_config(args)?;
    let index = config.tree().index();

    for line in tree_lines(config.tree()) {
        let names: Vec<String> = line
            .iter()
            .map(|id| {
                index
                    .canonical_name(*id)
                    .map_or_else(|| id.to_string(), |name| format!("{name} ({id})"))
            })
            .collect();
        println!("{}", names.join(" -> "));
    }
    Ok(())
}

fn print_aliases(args: &ArgMatches) -> anyhow::Result<()> {
    let config = load_config(args)?;

    for alias in config.tree().all_aliases() {
        println!("{alias}");
    }
    if !config.help_contacts().is_empty() {
        println!();
        println!("Help contacts: {}", config.help_contacts().join(", "));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let matches = cli().get_matches();
    init_tracing(matches.get_flag("log-json"));

    match matches.subcommand() {
        Some(("validate", args)) => {
            let code = validate(args).await?;
            if code != EXIT_CLEAN {
                std::process::exit(code);
            }
        }
        Some(("lines", args)) => print_lines(args)?,
        Some(("aliases", args)) => print_aliases(args)?,
        _ => unreachable!("subcommand is required"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use roster_audit::audit;
    use roster_model::ChatTree;
    use roster_test_utils::{chat, directory, flagged, snapshot};

    fn summary(rosters: &[(i64, &[i64])], notifications_sent: usize) -> ValidationSummary {
        let tree =
            ChatTree::new(vec![flagged(1, "Main").with_children(vec![chat(2, "Team")])]).unwrap();
        let outcome = audit(&tree, &snapshot(rosters)).unwrap();
        let report = outcome.render(&directory(&[1, 2, 3]), &tree.index()).unwrap();
        ValidationSummary {
            outcome,
            report,
            notifications_sent,
        }
    }

    fn clean() -> ValidationSummary {
        summary(&[(1, &[1]), (2, &[1])], 0)
    }

    fn with_gaps(notifications_sent: usize) -> ValidationSummary {
        summary(&[(1, &[1, 2]), (2, &[1, 3])], notifications_sent)
    }

    #[test]
    fn exit_code_reflects_violations() {
        assert_eq!(exit_code(&clean()), 0);
        assert_eq!(exit_code(&with_gaps(1)), 2);
    }

    #[test]
    fn clean_run_prints_nothing() {
        assert_eq!(stdout_payload(&clean(), false, false).unwrap(), None);
        assert_eq!(stdout_payload(&clean(), false, true).unwrap(), None);
    }

    #[test]
    fn report_printed_only_without_targets() {
        let delivered = with_gaps(1);
        assert_eq!(stdout_payload(&delivered, false, true).unwrap(), None);

        let undelivered = with_gaps(0);
        let out = stdout_payload(&undelivered, false, false).unwrap().unwrap();
        assert_eq!(Some(out.as_str()), undelivered.report.as_deref());
        assert!(out.contains("any child chat of \"Main\""));
    }

    #[test]
    fn json_prints_only_violations() {
        let summary = with_gaps(1);
        let out = stdout_payload(&summary, true, true).unwrap().unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        let kinds: Vec<&str> = parsed
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v["kind"].as_str().unwrap())
            .collect();
        assert_eq!(kinds, vec!["ancestor_missing", "child_coverage_missing"]);
        assert!(!out.contains("is missing in"));

        assert_eq!(stdout_payload(&clean(), true, false).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn config_errors_are_validation_errors() {
        let matches = cli()
            .try_get_matches_from(["roster-check", "lines", "--config", "/nonexistent/config.json"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();

        let err = load_config(args).unwrap_err();
        let root = err.downcast_ref::<ValidationError>().unwrap();
        assert!(matches!(root, ValidationError::Config(_)));
        assert!(!root.is_retryable());
    }

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn validate_defaults() {
        let matches = cli()
            .try_get_matches_from(["roster-check", "validate", "--config", "c.json", "--roster", "r.json"])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "validate");
        assert_eq!(args.get_one::<usize>("concurrency"), Some(&4));
        assert_eq!(args.get_one::<u64>("timeout-secs"), Some(&30));
        assert!(!args.get_flag("json"));
    }

    #[test]
    fn roster_is_required() {
        assert!(cli()
            .try_get_matches_from(["roster-check", "validate", "--config", "c.json"])
            .is_err());
    }
}
