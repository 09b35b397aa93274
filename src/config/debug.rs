//! Debugging feature flags.
//!
//! Toggle individual diagnostics here; keep them `false` by default so
//! normal runs stay quiet. Everything in here is additionally gated behind
//! `cfg(debug_assertions)` at the call sites.

pub struct DebugFlags {
    /// Emit one line per page fetched from a forum backend.
    pub print_page_fetches: bool,
    /// Dump the full aligned series table after alignment.
    pub print_align_table: bool,
}

pub const DEBUG_FLAGS: DebugFlags = DebugFlags {
    print_page_fetches: true,
    print_align_table: false,
};
