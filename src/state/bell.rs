use neurorecall_notifications_util::{badge_label, Notification};

/// What the dropdown body should show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelState {
    /// List fetch in flight; nothing to show yet.
    Loading,
    /// Fetch resolved and there is nothing to list.
    Empty,
    /// At least one notification to render.
    Items,
}

/// Local view of the bell: unread badge, held notifications, dropdown state.
///
/// The unread count and the notification list are refreshed independently
/// (the count by the recurring poll, the list on dropdown open), so they are
/// allowed to disagree; staleness is bounded by the poll interval. All
/// mutations here are pure so the optimistic-update rules stay testable
/// without a runtime.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BellState {
    unread_count: u64,
    notifications: Vec<Notification>,
    is_open: bool,
    loading: bool,
}

impl BellState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn unread_count(&self) -> u64 {
        self.unread_count
    }

    /// Held notifications, server order preserved.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Badge text for the bell button, `None` when nothing is unread.
    pub fn badge_label(&self) -> Option<String> {
        badge_label(self.unread_count)
    }

    /// Loading wins over emptiness: a pending fetch shows the loading
    /// indicator even if a previous fetch left entries behind.
    pub fn panel_state(&self) -> PanelState {
        if self.loading {
            PanelState::Loading
        } else if self.notifications.is_empty() {
            PanelState::Empty
        } else {
            PanelState::Items
        }
    }

    /// Apply a fresh unread count from the poll.
    pub fn apply_count(&mut self, count: u64) {
        self.unread_count = count;
    }

    /// Apply the result of a list fetch.
    pub fn apply_list(&mut self, notifications: Vec<Notification>) {
        self.notifications = notifications;
        self.loading = false;
    }

    /// A list fetch failed; keep whatever was held before.
    pub fn list_fetch_failed(&mut self) {
        self.loading = false;
    }

    /// Toggle the dropdown. Returns true when this transition opened it,
    /// in which case the caller starts a list fetch.
    pub fn toggle_open(&mut self) -> bool {
        self.is_open = !self.is_open;
        if self.is_open {
            self.loading = true;
        }
        self.is_open
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    /// Record a server-accepted mark-one-read.
    ///
    /// A held entry is only counted down once: marking an entry that is
    /// already read locally leaves the count untouched. An id missing from
    /// the capped list still decrements, floored at zero, since the server
    /// may hold unread notifications the list fetch never returned.
    pub fn mark_read(&mut self, id: i64) {
        match self.notifications.iter_mut().find(|n| n.id == id) {
            Some(n) if n.is_read => {}
            Some(n) => {
                n.is_read = true;
                self.unread_count = self.unread_count.saturating_sub(1);
            }
            None => {
                self.unread_count = self.unread_count.saturating_sub(1);
            }
        }
    }

    /// Record a server-accepted mark-all-read.
    pub fn mark_all_read(&mut self) {
        for n in &mut self.notifications {
            n.is_read = true;
        }
        self.unread_count = 0;
    }
}
