// Pipeline orchestration run before the GUI starts
pub mod pre_main_async;

// Re-export commonly used items
pub use pre_main_async::{build_aligned_series, collect_all_forums};
