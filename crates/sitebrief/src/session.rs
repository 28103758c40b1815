//! Interactive session state
//!
//! Holds the most recent `{url, report}` pair. Each completed analysis
//! replaces the pair as a whole; there is no history.

/// MIME type of a downloaded report
pub const DOWNLOAD_MIME: &str = "text/plain";

/// Last analysis shown to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEntry {
    /// URL that was analyzed
    pub url: String,
    /// Report text exactly as shown
    pub report: String,
}

impl SessionEntry {
    /// True if the report is the all-models-rate-limited notice
    pub fn is_rate_limit_notice(&self) -> bool {
        self.report.contains("⚠️") && self.report.contains("RATE LIMITED")
    }

    /// Report packaged as a downloadable file
    pub fn download(&self) -> Download {
        Download {
            filename: download_filename(&self.url),
            mime: DOWNLOAD_MIME,
            content: self.report.clone(),
        }
    }
}

/// A report ready to be written to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub mime: &'static str,
    pub content: String,
}

/// How the current session content should be presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionView<'a> {
    /// Nothing analyzed yet
    Empty,
    /// A normal report, or a single-model error message
    Report { url: &'a str, report: &'a str },
    /// The rate-limit notice, shown error-styled
    RateLimited { url: &'a str, notice: &'a str },
}

/// Holder of the single current analysis
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    current: Option<SessionEntry>,
}

impl SessionState {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current analysis
    pub fn store(&mut self, url: impl Into<String>, report: impl Into<String>) {
        self.current = Some(SessionEntry {
            url: url.into(),
            report: report.into(),
        });
    }

    /// Current analysis, if any
    pub fn current(&self) -> Option<&SessionEntry> {
        self.current.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.current.is_none()
    }

    /// Presentation of the current analysis
    pub fn view(&self) -> SessionView<'_> {
        match &self.current {
            None => SessionView::Empty,
            Some(entry) if entry.is_rate_limit_notice() => SessionView::RateLimited {
                url: &entry.url,
                notice: &entry.report,
            },
            Some(entry) => SessionView::Report {
                url: &entry.url,
                report: &entry.report,
            },
        }
    }
}

/// File name a report for `url` is saved under
///
/// Scheme prefixes are dropped and path separators become underscores.
pub fn download_filename(url: &str) -> String {
    let stem = url
        .replace("https://", "")
        .replace("http://", "")
        .replace(['/', '\\'], "_");
    format!("website_analysis_{}.txt", stem)
}
