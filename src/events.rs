//! Typed change notifications.
//!
//! Collections record the events they fire into an [`EventQueue`]; the
//! orchestration layer drains those queues after every command and hands
//! each event to the split view, the session persistence layer, and every
//! callback registered on the [`EventBus`].

use crate::tab::TabId;
use crate::tab_group::GroupId;
use crate::workspace::WorkspaceId;
use std::ops::Range;

/// Which field of a tab changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabField {
    Url,
    InitialUrl,
    PageTitle,
    CustomTitle,
    Essential,
    Group,
    Loading,
    AudioPlaying,
    Muted,
    Favicon,
    Thumbnail,
}

impl TabField {
    /// Whether the field is part of the session snapshot.
    ///
    /// Renderer-only state (loading, audio, favicon, thumbnail) changes
    /// constantly and never schedules a save.
    pub fn is_persisted(self) -> bool {
        matches!(
            self,
            TabField::Url
                | TabField::InitialUrl
                | TabField::PageTitle
                | TabField::CustomTitle
                | TabField::Essential
                | TabField::Group
        )
    }
}

/// A change fired by one of the state collections.
#[derive(Debug, Clone, PartialEq)]
pub enum ChangeEvent {
    /// Tabs were inserted or reordered
    TabsChanged { workspace: WorkspaceId },
    /// A single tab field changed
    TabUpdated {
        workspace: WorkspaceId,
        tab: TabId,
        field: TabField,
    },
    /// Rows in `range` (positions before the removal) were removed
    RowsRemoved {
        workspace: WorkspaceId,
        range: Range<usize>,
    },
    /// The whole tab list was replaced
    TabsReset { workspace: WorkspaceId },
    ActiveTabChanged {
        workspace: WorkspaceId,
        tab: Option<TabId>,
    },
    /// A group was added, removed or edited
    GroupsChanged {
        workspace: WorkspaceId,
        group: Option<GroupId>,
    },
    /// Workspaces were added, removed, reordered or edited
    WorkspacesChanged,
    ActiveWorkspaceChanged { workspace: Option<WorkspaceId> },
    SplitViewChanged,
    RecentlyClosedChanged,
    /// A session snapshot replaced the whole graph
    SessionRestored,
}

impl ChangeEvent {
    /// Whether the event touches state that ends up in the session snapshot.
    pub fn affects_snapshot(&self) -> bool {
        match self {
            ChangeEvent::TabUpdated { field, .. } => field.is_persisted(),
            ChangeEvent::SessionRestored => false,
            _ => true,
        }
    }
}

/// Pending events fired by one collection.
#[derive(Debug, Default)]
pub struct EventQueue {
    pending: Vec<ChangeEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: ChangeEvent) {
        log::trace!("change event: {:?}", event);
        self.pending.push(event);
    }

    /// Move all pending events into `out`, preserving order.
    pub fn drain_into(&mut self, out: &mut Vec<ChangeEvent>) {
        out.append(&mut self.pending);
    }

    pub fn take(&mut self) -> Vec<ChangeEvent> {
        std::mem::take(&mut self.pending)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Handle returned by [`EventBus::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback = Box<dyn FnMut(&ChangeEvent)>;

/// Callback registry for observers outside the core (UI, tests).
#[derive(Default)]
pub struct EventBus {
    subscribers: Vec<(SubscriptionId, Callback)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, callback: impl FnMut(&ChangeEvent) + 'static) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub fn publish(&mut self, event: &ChangeEvent) {
        for (_, callback) in &mut self.subscribers {
            callback(event);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}
