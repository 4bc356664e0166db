//! Top-level CLI definition and dispatch.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};
use clap_complete::{Shell as CompletionShell, generate};
use colored::{Colorize, control};
use serde_json::{Value, json};
use thiserror::Error;

use prerender_sanitizer::core::config::Config;
use prerender_sanitizer::core::errors::PsanError;
use prerender_sanitizer::logger::jsonl::{AuditRecord, AuditWriter};
use prerender_sanitizer::logger::{healthy_line, removed_line};
use prerender_sanitizer::sanitizer::artifacts::Route;
use prerender_sanitizer::sanitizer::{SanitizeReport, Sanitizer, SanitizerConfig};

/// Prerender Sanitizer — deletes corrupted prerender artifacts before deployment.
#[derive(Debug, Parser)]
#[command(
    name = "psan",
    author,
    version,
    about = "Prerender Sanitizer - corrupted artifact cleanup",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Override config file path.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Force JSON output mode.
    #[arg(long, global = true)]
    json: bool,
    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
    /// Quiet mode (suppress informational lines).
    #[arg(short, long, global = true)]
    quiet: bool,
    /// Subcommand to execute.
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Validate route artifacts and delete corrupted triples.
    Clean(CleanArgs),
    /// Validate route artifacts and report verdicts without deleting.
    Scan(ScanArgs),
    /// View configuration state.
    Config(ConfigArgs),
    /// Generate shell completions.
    Completions(CompletionsArgs),
}

#[derive(Debug, Clone, Args, Default)]
struct CleanArgs {
    /// Build output directory (defaults to the current working directory).
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,
    /// Route names to validate (defaults to configured routes).
    #[arg(value_name = "ROUTE")]
    routes: Vec<String>,
    /// Report removals without deleting anything.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Clone, Args, Default)]
struct ScanArgs {
    /// Build output directory (defaults to the current working directory).
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,
    /// Route names to validate (defaults to configured routes).
    #[arg(value_name = "ROUTE")]
    routes: Vec<String>,
}

#[derive(Debug, Clone, Args, Default)]
struct ConfigArgs {
    /// Config operation to run.
    #[command(subcommand)]
    command: Option<ConfigCommand>,
}

#[derive(Debug, Clone, Subcommand)]
enum ConfigCommand {
    /// Print resolved config file path.
    Path,
    /// Print effective merged configuration.
    Show,
    /// Validate configuration and exit.
    Validate,
}

#[derive(Debug, Clone, Args)]
struct CompletionsArgs {
    /// Shell to generate completion script for.
    #[arg(value_enum)]
    shell: CompletionShell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid user input at runtime.
    #[error("{0}")]
    User(String),
    /// Environment/runtime failure.
    #[error("{0}")]
    Runtime(String),
    /// Internal bug or invariant violation.
    #[error("{0}")]
    Internal(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Internal(_) | Self::Json(_) => 3,
        }
    }
}

/// Dispatch CLI commands.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    match &cli.command {
        Command::Clean(args) => run_clean(cli, args),
        Command::Scan(args) => run_scan(cli, args),
        Command::Config(args) => run_config(cli, args),
        Command::Completions(args) => {
            let mut command = Cli::command();
            let binary_name = command.get_name().to_string();
            generate(args.shell, &mut command, binary_name, &mut io::stdout());
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    Config::load(cli.config.as_deref()).map_err(|e| match e {
        PsanError::MissingConfig { .. } | PsanError::InvalidConfig { .. } => {
            CliError::User(e.to_string())
        }
        other => CliError::Runtime(other.to_string()),
    })
}

fn resolve_routes(explicit: &[String], config: &Config) -> Vec<Route> {
    let names = if explicit.is_empty() {
        &config.sanitize.routes
    } else {
        explicit
    };
    names.iter().map(Route::new).collect()
}

fn build_sanitizer(dir: Option<&PathBuf>, config: &Config, dry_run: bool) -> Sanitizer {
    Sanitizer::new(&SanitizerConfig {
        target_dir: dir.cloned().unwrap_or_else(|| PathBuf::from(".")),
        app_subdir: config.sanitize.app_subdir.clone(),
        dry_run,
    })
}

// ──────────────────── clean ────────────────────

fn run_clean(cli: &Cli, args: &CleanArgs) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let routes = resolve_routes(&args.routes, &config);
    let dry_run = args.dry_run || config.sanitize.dry_run;
    let sanitizer = build_sanitizer(args.dir.as_ref(), &config, dry_run);

    let report = sanitizer.run(&routes);

    write_audit_trail(&config, &report);

    match output_mode(cli) {
        OutputMode::Human => {
            // A missing output directory means nothing was built: say nothing.
            if report.skipped_missing_dir {
                return Ok(());
            }
            if !(cli.quiet || config.report.quiet) {
                for entry in &report.removed {
                    println!("{}", removed_line(&entry.route));
                }
                if report.healthy() {
                    println!("{}", healthy_line());
                } else if report.dry_run {
                    println!("[sanitize] dry-run: nothing was deleted");
                }
            }
        }
        OutputMode::Json => {
            let payload = clean_payload(&report);
            write_json_line(&payload)?;
        }
    }

    // Per-route validation failures are cleanup work, not process failures.
    Ok(())
}

fn write_audit_trail(config: &Config, report: &SanitizeReport) {
    let Some(path) = &config.report.audit_log else {
        return;
    };
    if report.skipped_missing_dir {
        return;
    }
    let mut audit = AuditWriter::open(path);
    for entry in &report.removed {
        audit.record(&AuditRecord::route_removed(entry));
    }
    audit.record(&AuditRecord::pass_completed(
        report.routes_examined,
        report.removed.len(),
        report.dry_run,
    ));
}

fn clean_payload(report: &SanitizeReport) -> Value {
    let removed: Vec<Value> = report
        .removed
        .iter()
        .map(|entry| {
            json!({
                "route": entry.route.as_url_path(),
                "html_fault": entry.verdict.html.map(|fault| fault.as_str()),
                "meta_fault": entry.verdict.meta.map(|fault| fault.as_str()),
                "files_removed": entry.outcome.files_removed,
            })
        })
        .collect();

    json!({
        "command": "clean",
        "app_server_dir": report.app_server_dir.to_string_lossy(),
        "skipped_missing_dir": report.skipped_missing_dir,
        "routes_examined": report.routes_examined,
        "removed": removed,
        "healthy": report.healthy(),
        "dry_run": report.dry_run,
    })
}

// ──────────────────── scan ────────────────────

fn run_scan(cli: &Cli, args: &ScanArgs) -> Result<(), CliError> {
    let config = load_config(cli)?;
    let routes = resolve_routes(&args.routes, &config);
    let sanitizer = build_sanitizer(args.dir.as_ref(), &config, true);

    let assessments = sanitizer.assess(&routes);

    match output_mode(cli) {
        OutputMode::Human => match &assessments {
            None => {
                println!(
                    "No app server directory at {} — nothing to scan.",
                    sanitizer.app_server_dir().display()
                );
            }
            Some(entries) => {
                let mut corrupted = 0usize;
                for entry in entries {
                    if entry.verdict.is_valid() {
                        println!("  {:<30}  {}", entry.route.as_url_path(), "ok".green());
                    } else {
                        corrupted += 1;
                        println!(
                            "  {:<30}  {} ({})",
                            entry.route.as_url_path(),
                            "corrupted".red(),
                            describe_faults(&entry.verdict),
                        );
                    }
                }
                println!();
                if corrupted == 0 {
                    println!("{}", healthy_line());
                } else {
                    println!(
                        "[sanitize] {corrupted} of {} route(s) would be removed by `psan clean`",
                        entries.len()
                    );
                }
            }
        },
        OutputMode::Json => {
            let entries: Vec<Value> = assessments
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(|entry| {
                    json!({
                        "route": entry.route.as_url_path(),
                        "valid": entry.verdict.is_valid(),
                        "html_fault": entry.verdict.html.map(|fault| fault.as_str()),
                        "meta_fault": entry.verdict.meta.map(|fault| fault.as_str()),
                    })
                })
                .collect();
            let payload = json!({
                "command": "scan",
                "app_server_dir": sanitizer.app_server_dir().to_string_lossy(),
                "skipped_missing_dir": assessments.is_none(),
                "routes": entries,
            });
            write_json_line(&payload)?;
        }
    }

    Ok(())
}

fn describe_faults(verdict: &prerender_sanitizer::sanitizer::validate::RouteVerdict) -> String {
    let mut parts = Vec::new();
    if let Some(fault) = verdict.html {
        parts.push(format!("html: {}", fault.as_str()));
    }
    if let Some(fault) = verdict.meta {
        parts.push(format!("meta: {}", fault.as_str()));
    }
    parts.join(", ")
}

// ──────────────────── config ────────────────────

fn run_config(cli: &Cli, args: &ConfigArgs) -> Result<(), CliError> {
    match args.command.as_ref().unwrap_or(&ConfigCommand::Show) {
        ConfigCommand::Path => {
            let path = cli
                .config
                .clone()
                .unwrap_or_else(Config::default_path);
            match output_mode(cli) {
                OutputMode::Human => println!("{}", path.display()),
                OutputMode::Json => {
                    write_json_line(&json!({
                        "command": "config path",
                        "path": path.to_string_lossy(),
                    }))?;
                }
            }
            Ok(())
        }
        ConfigCommand::Show => {
            let config = load_config(cli)?;
            match output_mode(cli) {
                OutputMode::Human => {
                    let rendered = toml::to_string_pretty(&config)
                        .map_err(|e| CliError::Internal(e.to_string()))?;
                    print!("{rendered}");
                }
                OutputMode::Json => {
                    let payload = serde_json::to_value(&config)?;
                    write_json_line(&payload)?;
                }
            }
            Ok(())
        }
        ConfigCommand::Validate => {
            let config = load_config(cli)?;
            match output_mode(cli) {
                OutputMode::Human => {
                    println!(
                        "Configuration OK ({} route(s), app_subdir {}).",
                        config.sanitize.routes.len(),
                        config.sanitize.app_subdir.display()
                    );
                }
                OutputMode::Json => {
                    write_json_line(&json!({
                        "command": "config validate",
                        "ok": true,
                        "routes": config.sanitize.routes,
                    }))?;
                }
            }
            Ok(())
        }
    }
}

// ──────────────────── output helpers ────────────────────

fn output_mode(cli: &Cli) -> OutputMode {
    if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Human
    }
}

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    stdout.write_all(b"\n")?;
    Ok(())
}
