//! sitebrief CLI - analyze a website from the command line

mod interactive;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use sitebrief::{
    AnalysisOutcome, AnalysisStatus, Analyzer, AnalyzerBuilder, GenerationOutcome, SessionState,
    SessionView, DEFAULT_MODEL, USAGE_GUIDE,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Output format for the analyze subcommand
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// The report exactly as generated
    #[default]
    Text,
    /// JSON record with url, model and outcome kind
    Json,
}

/// sitebrief - structured website reports from Gemini
#[derive(Parser, Debug)]
#[command(name = "sitebrief")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Print the usage guide
    #[arg(long)]
    guide: bool,

    /// Gemini API key
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Log debug output to stderr
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Analyze one website and print the report
    Analyze {
        /// URL of the page to analyze
        url: String,

        /// Model to ask first (default: first model of the catalog)
        #[arg(long, short)]
        model: Option<String>,

        /// Output format
        #[arg(long, short, default_value = "text")]
        output: OutputFormat,

        /// Also save the report as website_analysis_<url>.txt
        #[arg(long)]
        save: bool,

        /// Directory the saved report is written to
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Custom User-Agent for the page fetch
        #[arg(long)]
        user_agent: Option<String>,
    },
    /// List models that can generate reports
    Models,
    /// Interactive session: analyze, switch model or key, save reports
    Interactive,
}

/// Machine-readable analysis result
#[derive(Debug, Serialize)]
struct AnalysisRecord<'a> {
    url: &'a str,
    /// "report", "error", "rate_limited" or "fetch_error"
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
    report: String,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.guide {
        writeln_safe(USAGE_GUIDE);
        std::process::exit(0);
    }

    match cli.command {
        Some(Commands::Analyze {
            url,
            model,
            output,
            save,
            out_dir,
            user_agent,
        }) => {
            let mut builder = Analyzer::builder();
            if let Some(ua) = user_agent {
                builder = builder.user_agent(ua);
            }
            let analyzer = build_analyzer(builder, require_api_key(cli.api_key));
            run_analyze(&analyzer, &url, model, output, save.then_some(out_dir.as_path())).await;
        }
        Some(Commands::Models) => {
            let analyzer = build_analyzer(Analyzer::builder(), require_api_key(cli.api_key));
            for model in analyzer.models().await {
                writeln_safe(&model);
            }
        }
        Some(Commands::Interactive) => {
            if let Err(e) = interactive::run(cli.api_key).await {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            eprintln!("Usage: sitebrief analyze <URL>");
            eprintln!("   or: sitebrief interactive");
            eprintln!("   or: sitebrief --guide");
            std::process::exit(1);
        }
    }
}

/// Log filter used when RUST_LOG is unset; failures already reach the user
/// as rendered messages, so nothing is logged unless asked for
fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "sitebrief=debug"
    } else {
        "off"
    }
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn require_api_key(api_key: Option<String>) -> String {
    match api_key.filter(|k| !k.trim().is_empty()) {
        Some(key) => key,
        None => {
            eprintln!("Error: No API key configured");
            eprintln!("Set GEMINI_API_KEY or pass --api-key <KEY>");
            std::process::exit(1);
        }
    }
}

fn build_analyzer(builder: AnalyzerBuilder, api_key: String) -> Analyzer {
    builder.api_key(api_key).build().unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    })
}

async fn run_analyze(
    analyzer: &Analyzer,
    url: &str,
    model: Option<String>,
    output: OutputFormat,
    save_dir: Option<&Path>,
) {
    let model = match model {
        Some(model) => model,
        None => analyzer
            .models()
            .await
            .into_iter()
            .next()
            .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
    };

    let outcome = analyzer
        .analyze_with_status(url, &model, |status| {
            if let AnalysisStatus::RateLimited { .. } = status {
                eprintln!("Warning: {}", status);
            }
        })
        .await;

    match output {
        OutputFormat::Text => match &outcome {
            AnalysisOutcome::FetchFailed(_) => eprintln!("{}", outcome),
            _ => writeln_safe(&outcome.render()),
        },
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&analysis_record(url, &outcome))
                .unwrap_or_else(|e| {
                    eprintln!("Error serializing report: {}", e);
                    std::process::exit(1);
                });
            writeln_safe(&json);
        }
    }

    if let (Some(dir), Some(report)) = (save_dir, outcome.session_report()) {
        let mut session = SessionState::new();
        session.store(url, report);
        match save_report(&session, dir) {
            Ok(Some((path, mime))) => eprintln!("Saved report to {} ({})", path.display(), mime),
            Ok(None) => {}
            Err(e) => {
                eprintln!("Error saving report: {}", e);
                std::process::exit(1);
            }
        }
    }

    if !outcome.is_report() {
        std::process::exit(1);
    }
}

/// Describe an outcome as a serializable record
fn analysis_record<'a>(url: &'a str, outcome: &'a AnalysisOutcome) -> AnalysisRecord<'a> {
    let (kind, model) = match outcome {
        AnalysisOutcome::FetchFailed(_) => ("fetch_error", None),
        AnalysisOutcome::Generated(GenerationOutcome::Report { model, .. }) => {
            ("report", Some(model.as_str()))
        }
        AnalysisOutcome::Generated(GenerationOutcome::Failed { model, .. }) => {
            ("error", Some(model.as_str()))
        }
        AnalysisOutcome::Generated(GenerationOutcome::Exhausted { .. }) => ("rate_limited", None),
    };

    AnalysisRecord {
        url,
        kind,
        model,
        report: outcome.render(),
    }
}

/// Write the session report to `dir`; the rate-limit notice is never saved
///
/// Returns the written path and the file's MIME type.
pub(crate) fn save_report(
    session: &SessionState,
    dir: &Path,
) -> io::Result<Option<(PathBuf, &'static str)>> {
    let SessionView::Report { .. } = session.view() else {
        return Ok(None);
    };
    let Some(entry) = session.current() else {
        return Ok(None);
    };

    let download = entry.download();
    let path = dir.join(&download.filename);
    std::fs::write(&path, download.content.as_bytes())?;
    Ok(Some((path, download.mime)))
}

/// Write to stdout, exit silently on broken pipe
pub(crate) fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
