//! The complete mutable graph: workspaces, split view and closed-tab history.

use crate::events::ChangeEvent;
use crate::pane::SplitPaneController;
use crate::recently_closed::RecentlyClosedStack;
use crate::workspace::WorkspaceContainer;
use tabshell_config::Config;

#[derive(Debug)]
pub struct ShellState {
    pub workspaces: WorkspaceContainer,
    pub split_view: SplitPaneController,
    pub recently_closed: RecentlyClosedStack,
}

impl ShellState {
    pub fn new(config: &Config) -> Self {
        Self {
            workspaces: WorkspaceContainer::new(),
            split_view: SplitPaneController::new(&config.new_tab_url),
            recently_closed: RecentlyClosedStack::new(config.recently_closed_capacity()),
        }
    }

    /// Collect every pending event, workspaces first.
    pub fn drain_events(&mut self) -> Vec<ChangeEvent> {
        let mut out = Vec::new();
        self.workspaces.drain_events_into(&mut out);
        self.split_view.drain_events_into(&mut out);
        self.recently_closed.drain_events_into(&mut out);
        out
    }
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}
