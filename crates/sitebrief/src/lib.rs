//! sitebrief - structured website reports from a generation model
//!
//! This crate fetches a single page, extracts its visible text and asks a
//! generation model for a fixed-section plain-text report about the site.
//!
//! ## Pipeline
//!
//! 1. [`fetch_page`] - GET with a browser User-Agent and a 10 second timeout
//! 2. [`extract_visible_text`] - strip script/style, normalize, cap at 40,000 chars
//! 3. [`ReportGenerator`] - prompt the selected model, falling back to lighter
//!    models on quota errors, and strip markup from the reply
//! 4. [`SessionState`] - keep the latest `{url, report}` for display and download
//!
//! [`Analyzer`] runs the whole pipeline. The generation service sits behind
//! the [`GenerationBackend`] trait; [`GeminiClient`] is the built-in one.

pub mod analyzer;
pub mod backend;
pub mod catalog;
mod error;
pub mod extract;
pub mod fetch;
pub mod gemini;
pub mod prompt;
pub mod report;
pub mod session;

pub use analyzer::{AnalysisOutcome, AnalysisStatus, Analyzer, AnalyzerBuilder};
pub use backend::{GenerationBackend, ModelInfo, ModelName};
pub use catalog::{default_model, list_generation_models, DEFAULT_MODEL, FALLBACK_CATALOG};
pub use error::{is_quota_description, FetchError, GenerationError, FETCH_ERROR_PREFIX};
pub use extract::{extract_visible_text, html_to_text, MAX_CONTENT_CHARS};
pub use fetch::{fetch_page, FetchOptions, FetchResult, DEFAULT_FETCH_TIMEOUT};
pub use gemini::{GeminiClient, GeminiConfig};
pub use prompt::{build_prompt, SECTION_HEADINGS};
pub use report::{
    sanitize_report, FallbackPlan, GenerationOutcome, ReportGenerator, DEFAULT_FALLBACK_MODELS,
    RATE_LIMIT_NOTICE,
};
pub use session::{download_filename, Download, SessionEntry, SessionState, SessionView};

/// Browser-like User-Agent sent with page fetches
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Short tool description
pub const TOOL_DESCRIPTION: &str = r#"Analyzes a website and writes a structured plain-text report about it.

- Fetches the visible text of a single page
- Asks a Gemini model for a twelve-section report
- Falls back to lighter models when a model is rate limited
- Saves the report as a .txt file"#;

/// Extended usage guide
pub const USAGE_GUIDE: &str = r#"# Website Analyzer - How to Use

## Purpose
Automatically analyzes any website and extracts:
- Website overview and purpose
- Target audience analysis
- Features and services
- Pricing information
- Company details
- Contact information
- And more

## Steps

1. Enter the website URL
   - Paste the complete URL, including https:// or http://
   - Example: https://example.com

2. Run the analysis
   - The page content is fetched
   - Gemini analyzes all available information
   - This may take 10-30 seconds depending on website size

3. View the results
   - The report is organized into clear sections
   - Everything is plain text (no markdown symbols)

4. Keep the results
   - Copy the printed report, or
   - Save it as website_analysis_<url>.txt

## API Key Management
- If you hit rate limits, use a different API key
- Create keys at https://aistudio.google.com/apikey
- Pass it with --api-key or the "Use a different API key" menu entry

## Model Selection
- Different models have different quotas
- If one model is rate limited, select a lighter model
- Fallback models are tried automatically on rate limits

## Troubleshooting

Rate limit errors:
- Free tier limits: 15 requests/minute, 1500 requests/day
- Wait 1-2 hours for the quota to reset
- Create a new API key
- Select a lighter model

Website not loading:
- Check that the URL is correct and reachable
- Some websites block automated access
- Try opening the website in a browser first

Incomplete analysis:
- Some websites publish little information
- Only visible content of the page is analyzed
- Content rendered by JavaScript is not captured

## Tips
1. Use complete URLs, including the path of the page you care about
2. Landing and product pages usually carry the most information
3. Run the tool on several pages for a fuller picture
4. Save results to keep a record
5. Space out requests to stay within quota
"#;
