//! Interactive session
//!
//! Menu loop around one [`Analyzer`] and one [`SessionState`]. The session
//! keeps only the latest `{url, report}` pair; each analysis replaces it.

use crate::{save_report, writeln_safe};
use anyhow::{Context, Result};
use console::style;
use dialoguer::{theme::ColorfulTheme, Input, Password, Select};
use sitebrief::{
    default_model, AnalysisOutcome, AnalysisStatus, Analyzer, ModelName, SessionState,
    SessionView, USAGE_GUIDE,
};
use std::path::Path;

const MENU: &[&str] = &[
    "🔎 Analyze a website",
    "🧠 Select model",
    "🔑 Use a different API key",
    "📄 Show last analysis",
    "💾 Save last analysis as TXT",
    "📖 How to use this tool",
    "🚪 Exit",
];

struct Session {
    analyzer: Analyzer,
    state: SessionState,
    model: ModelName,
    theme: ColorfulTheme,
}

/// Run the interactive session until the user exits
pub async fn run(api_key: Option<String>) -> Result<()> {
    print_banner();

    let theme = ColorfulTheme::default();
    let api_key = match api_key.filter(|k| !k.trim().is_empty()) {
        Some(key) => key,
        None => Password::with_theme(&theme)
            .with_prompt("Gemini API key")
            .interact()
            .context("reading API key")?,
    };

    let analyzer = Analyzer::builder()
        .api_key(api_key)
        .build()
        .context("creating analyzer")?;

    let mut session = Session {
        analyzer,
        state: SessionState::new(),
        model: String::new(),
        theme,
    };
    session.model = session.load_default_model().await;
    println!("Model: {}", style(&session.model).cyan());

    loop {
        println!();
        let choice = Select::with_theme(&session.theme)
            .with_prompt("What would you like to do?")
            .items(MENU)
            .default(0)
            .interact()
            .context("reading menu choice")?;

        match choice {
            0 => session.analyze().await?,
            1 => session.select_model().await?,
            2 => session.change_api_key().await?,
            3 => session.present(),
            4 => session.save(Path::new(".")),
            5 => writeln_safe(USAGE_GUIDE),
            _ => break,
        }
    }

    Ok(())
}

impl Session {
    async fn load_default_model(&self) -> ModelName {
        let catalog = self.analyzer.models().await;
        if catalog.is_empty() {
            print_warning("Could not load models, using default");
        }
        default_model(&catalog)
    }

    async fn analyze(&mut self) -> Result<()> {
        let url: String = Input::with_theme(&self.theme)
            .with_prompt("Enter Website URL")
            .with_initial_text("https://")
            .interact_text()
            .context("reading URL")?;
        let url = url.trim().to_string();

        let outcome = self
            .analyzer
            .analyze_with_status(&url, &self.model, |status| match status {
                AnalysisStatus::RateLimited { .. } => print_warning(&status.to_string()),
                AnalysisStatus::Complete => {}
                _ => println!("{}", style(status.to_string()).dim()),
            })
            .await;

        match outcome {
            AnalysisOutcome::FetchFailed(ref e) => print_error(&e.user_message()),
            _ => {
                if let Some(report) = outcome.session_report() {
                    self.state.store(url, report);
                }
                self.present();
            }
        }
        Ok(())
    }

    async fn select_model(&mut self) -> Result<()> {
        let catalog = self.analyzer.models().await;
        if catalog.is_empty() {
            print_warning("Could not load models, using default");
            self.model = default_model(&catalog);
            return Ok(());
        }

        let choice = Select::with_theme(&self.theme)
            .with_prompt("Select Model (try lighter models if rate limited)")
            .items(&catalog)
            .default(0)
            .interact()
            .context("reading model choice")?;
        self.model = catalog[choice].clone();
        println!("Model: {}", style(&self.model).cyan());
        Ok(())
    }

    async fn change_api_key(&mut self) -> Result<()> {
        let key = Password::with_theme(&self.theme)
            .with_prompt("Use a different API key")
            .allow_empty_password(true)
            .interact()
            .context("reading API key")?;
        if key.trim().is_empty() {
            return Ok(());
        }

        self.analyzer
            .set_api_key(key.trim())
            .context("applying API key")?;
        println!("{}", style("✅ Using custom API key").green());
        self.model = self.load_default_model().await;
        println!("Model: {}", style(&self.model).cyan());
        Ok(())
    }

    fn present(&self) {
        match self.state.view() {
            SessionView::Empty => println!("No analysis yet."),
            SessionView::Report { url, report } => {
                println!();
                println!("{}", style(format!("Analysis for: {}", url)).bold());
                println!("{}", style("─".repeat(64)).dim());
                writeln_safe(report);
                println!("{}", style("─".repeat(64)).dim());
                println!(
                    "{}",
                    style("💡 Select \"Save last analysis as TXT\" to keep a copy").dim()
                );
            }
            SessionView::RateLimited { url, notice } => {
                println!();
                println!("{}", style(format!("Analysis for: {}", url)).bold());
                print_error(notice);
                println!(
                    "{}",
                    style("💡 Try creating a fresh API key or wait for quota reset").yellow()
                );
            }
        }
    }

    fn save(&self, dir: &Path) {
        match save_report(&self.state, dir) {
            Ok(Some((path, mime))) => println!(
                "{} {} ({})",
                style("💾 Saved").green(),
                path.display(),
                mime
            ),
            Ok(None) => println!("Nothing to save."),
            Err(e) => print_error(&format!("Error saving report: {}", e)),
        }
    }
}

fn print_banner() {
    println!("{}", style("╔════════════════════════════════════════╗").cyan());
    println!("{}", style("║          🤖 Website Analyzer           ║").cyan());
    println!("{}", style("╚════════════════════════════════════════╝").cyan());
}

fn print_warning(msg: &str) {
    eprintln!("{}", style(format!("⚠ {}", msg)).yellow());
}

fn print_error(msg: &str) {
    eprintln!("{}", style(msg).red());
}
