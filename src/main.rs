//! arxiv-digest CLI - daily arXiv digest runner

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use arxiv_digest::arxiv::{target_date, ArxivClient, SearchQuery};
use arxiv_digest::artifacts::{collect_run_log, ARTIFACT_NAME};
use arxiv_digest::error::{DigestError, FixSuggestion};
use arxiv_digest::logging::{init_tracing, DailyLog, LogMark};
use arxiv_digest::mail::{CaptureMailer, SmtpMailer};
use arxiv_digest::provider::OpenAiCompatProvider;
use arxiv_digest::runtime::{
    generate_run_id, parse_cron, run_scheduler, DigestPipeline, RunReport, Trigger,
};
use arxiv_digest::DigestConfig;

#[derive(Parser)]
#[command(name = "arxiv-digest")]
#[command(about = "Daily arXiv digest: search, translate with an LLM, deliver by email")]
#[command(version)]
struct Cli {
    /// Directory receiving arxiv-digest-<date>.log
    #[arg(long, global = true, env = "DIGEST_LOG_DIR", default_value = ".")]
    log_dir: PathBuf,

    /// Config file (default: ~/.config/arxiv-digest/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search, enrich and email the digest for one day
    Run {
        /// Day to report on (default: yesterday, local time)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Print the digest instead of sending it
        #[arg(long)]
        dry_run: bool,
    },

    /// Search arXiv for one term (no LLM, no email)
    Search {
        /// Query term, e.g. "large language model"
        term: String,

        /// Day to filter on (default: yesterday, local time)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Results requested from arXiv
        #[arg(short, long)]
        max_results: Option<u32>,

        /// Print papers as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the digest on a cron schedule until Ctrl-C
    Schedule {
        /// 5-field cron expression in UTC (default: schedule.cron from config)
        #[arg(long)]
        cron: Option<String>,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration (secrets masked)
    Show,
    /// Validate everything a run needs
    Check,
}

#[tokio::main]
async fn main() {
    // Load .env file (ignore if not present)
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Only commands that perform a run keep a log file
    let log_dir = match cli.command {
        Commands::Run { .. } | Commands::Schedule { .. } => Some(cli.log_dir.as_path()),
        _ => None,
    };
    let run_log = match init_tracing(log_dir) {
        Ok(run_log) => run_log,
        Err(e) => {
            report_error(&e);
            std::process::exit(1);
        }
    };

    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Run { date, dry_run } => {
            let mark = run_log.as_ref().and_then(mark_run);
            let result = run_digest(config_path, date, dry_run).await;
            if result.is_err() {
                preserve_logs(run_log.as_ref(), mark.as_ref(), Trigger::Manual);
            }
            result
        }
        Commands::Search {
            term,
            date,
            max_results,
            json,
        } => search_term(config_path, term, date, max_results, json).await,
        Commands::Schedule { cron } => schedule(cli.config.clone(), cron, run_log).await,
        Commands::Config { action } => handle_config_command(config_path, action),
    };

    if let Err(e) = result {
        error!(code = e.code(), "{}", e);
        report_error(&e);
        std::process::exit(1);
    }
}

fn report_error(e: &DigestError) {
    eprintln!("{} {}", "Error:".red().bold(), e);
    if let Some(suggestion) = e.fix_suggestion() {
        eprintln!("  {} {}", "Fix:".yellow(), suggestion);
    }
}

/// File (or defaults) overlaid with the environment
fn load_config(path: Option<&Path>) -> Result<DigestConfig, DigestError> {
    DigestConfig::load(path)?.with_env()
}

fn build_pipeline(config: DigestConfig) -> Result<DigestPipeline, DigestError> {
    config.validate()?;
    let provider = OpenAiCompatProvider::from_config(&config.llm)?;
    let mailer = SmtpMailer::from_config(&config.mail)?;
    DigestPipeline::new(config, Arc::new(provider), Arc::new(mailer))
}

async fn run_digest(
    config_path: Option<&Path>,
    date: Option<NaiveDate>,
    dry_run: bool,
) -> Result<(), DigestError> {
    let config = load_config(config_path)?;
    let date = date.unwrap_or_else(|| target_date(Local::now()));

    println!(
        "{} Digest for {} | terms: {}",
        "→".cyan(),
        date.to_string().cyan().bold(),
        config.search.terms.join(", ").cyan()
    );

    if dry_run {
        config.validate_for_search()?;
        let provider = OpenAiCompatProvider::from_config(&config.llm)?;
        let pipeline =
            DigestPipeline::new(config, Arc::new(provider), Arc::new(CaptureMailer::new()))?;
        let (digest, report) = pipeline.compose(date).await?;

        println!("{} {}", "Subject:".cyan().bold(), digest.subject);
        println!("{}", digest.body);
        print_report(&report);
        return Ok(());
    }

    let pipeline = build_pipeline(config)?;
    let report = pipeline.run(date).await?;
    print_report(&report);
    Ok(())
}

fn print_report(report: &RunReport) {
    for (term, count) in &report.per_term {
        let failed = report.failed_terms.contains(term);
        let marker = if failed {
            "✗".red()
        } else if *count > 0 {
            "✓".green()
        } else {
            "·".dimmed()
        };
        println!("  {} {}: {}", marker, term, count);
    }
    println!("  Papers: {}", report.total);
    println!("  Subject: {}", report.subject);
    if report.sent {
        println!("{} Digest sent", "✓".green());
    } else {
        println!("{} Digest not sent (dry run)", "·".dimmed());
    }
}

async fn search_term(
    config_path: Option<&Path>,
    term: String,
    date: Option<NaiveDate>,
    max_results: Option<u32>,
    json: bool,
) -> Result<(), DigestError> {
    let config = load_config(config_path)?;
    config.validate_for_search()?;

    let date = date.unwrap_or_else(|| target_date(Local::now()));
    let client = ArxivClient::new(&config.search.api_url)?;
    let query = SearchQuery::new(
        term,
        config.search.category.clone(),
        max_results.unwrap_or(config.search.max_results),
    );
    let papers = client.search_on(&query, date).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&papers)?);
        return Ok(());
    }

    println!(
        "Found {} papers for {} on {}:\n",
        papers.len(),
        query.term.cyan(),
        date
    );
    for paper in &papers {
        println!("{} {}", paper.arxiv_id.yellow(), paper.title.bold());
        println!("  {}", paper.authors.join(", "));
        println!("  {}", paper.abs_url().dimmed());
    }
    Ok(())
}

async fn schedule(
    config_path: Option<PathBuf>,
    cron: Option<String>,
    run_log: Option<DailyLog>,
) -> Result<(), DigestError> {
    let config = load_config(config_path.as_deref())?;
    config.validate()?;
    let expr = cron.unwrap_or_else(|| config.schedule.cron.clone());
    parse_cron(&expr)?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    println!(
        "{} Scheduling digest with '{}' (UTC), Ctrl-C to stop",
        "→".cyan(),
        expr.cyan().bold()
    );

    run_scheduler(&expr, cancel, |trigger| {
        let config_path = config_path.clone();
        let run_log = run_log.clone();
        async move {
            let mark = run_log.as_ref().and_then(mark_run);
            let date = target_date(Local::now());
            // Reload per run so edits to config/.env apply to the next tick
            let outcome = match load_config(config_path.as_deref()).and_then(build_pipeline) {
                Ok(pipeline) => pipeline.run(date).await,
                Err(e) => Err(e),
            };
            match outcome {
                Ok(report) => info!(%trigger, total = report.total, "Scheduled run finished"),
                Err(e) => {
                    error!(%trigger, code = e.code(), error = %e, "Scheduled run failed");
                    preserve_logs(run_log.as_ref(), mark.as_ref(), trigger);
                }
            }
        }
    })
    .await
}

fn mark_run(run_log: &DailyLog) -> Option<LogMark> {
    run_log
        .mark()
        .map_err(|e| error!(error = %e, "Failed to mark run log"))
        .ok()
}

/// Copy this run's log output into `<log_dir>/execution-logs/<run-id>/`
fn preserve_logs(run_log: Option<&DailyLog>, mark: Option<&LogMark>, trigger: Trigger) {
    let (Some(run_log), Some(mark)) = (run_log, mark) else {
        return;
    };
    let run_id = generate_run_id(trigger, Utc::now());
    let dest_root = run_log.dir().join(ARTIFACT_NAME);
    match collect_run_log(mark, &run_log.current_path(), &dest_root, &run_id) {
        Ok(copied) if !copied.is_empty() => {
            eprintln!(
                "{} Logs saved to {}",
                "→".cyan(),
                dest_root.join(&run_id).display()
            );
        }
        Ok(_) => {}
        Err(e) => error!(error = %e, "Failed to preserve logs"),
    }
}

fn handle_config_command(
    config_path: Option<&Path>,
    action: ConfigAction,
) -> Result<(), DigestError> {
    let config = load_config(config_path)?;
    let source = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(DigestConfig::config_path);

    match action {
        ConfigAction::Show => {
            let rendered = toml::to_string_pretty(&config.redacted()).map_err(|e| {
                DigestError::ConfigError {
                    reason: format!("Failed to render config: {}", e),
                }
            })?;
            println!("# {} (+ environment)", source.display());
            println!("{}", rendered);
            Ok(())
        }
        ConfigAction::Check => {
            config.validate()?;
            parse_cron(&config.schedule.cron)?;

            println!("{} Configuration is valid", "✓".green());
            println!("  Sender: {}", config.mail.sender_email.as_deref().unwrap_or("-"));
            println!("  Receivers: {}", config.mail.receivers.len());
            println!(
                "  SMTP: {}:{} ({:?})",
                config.mail.smtp_server, config.mail.smtp_port, config.mail.security
            );
            println!("  Model: {} @ {}", config.llm.model, config.llm.api_base);
            println!("  Terms: {}", config.search.terms.join(", "));
            println!("  Schedule: {} (UTC)", config.schedule.cron);
            Ok(())
        }
    }
}
