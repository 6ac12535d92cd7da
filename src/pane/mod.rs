//! Split view support
//!
//! This module provides the multi-pane split view of the active workspace:
//! - `SplitPaneController`: Binds 2–4 pane slots to tab ids and keeps them valid
//! - `PaneLayout`: How the enabled panes are arranged on screen

mod controller;

pub use controller::SplitPaneController;

/// Fewest panes an enabled split view shows
pub const MIN_PANES: usize = 2;
/// Most panes a split view can show
pub const MAX_PANES: usize = 4;

pub const DEFAULT_SPLIT_RATIO: f64 = 0.5;
pub const MIN_SPLIT_RATIO: f64 = 0.1;
pub const MAX_SPLIT_RATIO: f64 = 0.9;

/// Arrangement of the visible panes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneLayout {
    /// Split view disabled, one tab fills the content area
    Single,
    /// Two panes side by side, divided by `split_ratio`
    Columns,
    /// Three or four panes in a 2x2 grid, divided by the grid ratios
    Grid,
}

/// Clamp a divider ratio into the usable range; non-finite values reset to the default.
pub(crate) fn clamp_ratio(ratio: f64) -> f64 {
    if ratio.is_finite() {
        ratio.clamp(MIN_SPLIT_RATIO, MAX_SPLIT_RATIO)
    } else {
        DEFAULT_SPLIT_RATIO
    }
}
