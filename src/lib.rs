// Core modules
pub mod collect;
pub mod config;
pub mod data;
pub mod domain;
pub mod market;
pub mod series;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use data::{build_aligned_series, collect_all_forums};
pub use domain::{ForumId, ForumPosts, WeekKey};
pub use series::{AlignedSeries, align_series, group_by_week};
pub use ui::CafePulseApp;

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log the aligned series instead of opening the chart window
    #[arg(long, default_value_t = false)]
    pub headless: bool,
}

/// Main application entry point - creates the GUI app
/// This is the public API for the binary to call
pub fn run_app(
    cc: &eframe::CreationContext,
    aligned: AlignedSeries,
) -> Box<dyn eframe::App> {
    let app = ui::CafePulseApp::new(cc, aligned);
    Box::new(app)
}
