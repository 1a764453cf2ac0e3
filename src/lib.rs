#![warn(missing_docs)]
//! Core library entry points for the clausecrawl contract-extension scanner.

pub mod controls;
pub mod fetch;
pub mod links;
pub mod matcher;
pub mod pdf;
pub mod render;
pub mod report;
pub mod runtime;
pub mod segment;

pub use controls::{Cli, RenderModeArg, ScanControls};
pub use fetch::{DocumentFetcher, FetchError};
pub use links::{extract_pdf_links, LinkExtractError};
pub use matcher::TriggerVocabulary;
pub use pdf::{extract_text, looks_like_pdf, PdfError};
#[cfg(feature = "browser")]
pub use render::BrowserRenderer;
pub use render::{RenderError, RenderMode, RenderedPage, Renderer, StaticRenderer};
pub use report::{DocumentStatus, ExportOptions, MatchResult, PageOutcome, RunReport};
pub use runtime::run as run_scan;
pub use segment::{segment, TextBlock};

#[cfg(feature = "debug_logs")]
#[macro_export]
// This allows use of the `eprintln!` macro via `debug_log!` macro.
macro_rules! debug_log {
        ($($arg:tt)*) => {
            eprintln!($($arg)*);
        };
    }
#[cfg(not(feature = "debug_logs"))]
#[macro_export]
// This effectively disables the `eprintln!` macro, effectively removing it from the code during
// compilation.
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}
