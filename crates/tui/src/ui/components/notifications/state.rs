use leaddash_types::Notification;

/// Local UI state for the notification panel: open flag and list selection.
#[derive(Debug, Clone, Default)]
pub struct NotificationPanelState {
    open: bool,
    selected_index: usize,
}

impl NotificationPanelState {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open the panel with the newest record selected.
    pub fn open(&mut self) {
        self.open = true;
        self.selected_index = 0;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn toggle(&mut self) {
        if self.open { self.close() } else { self.open() }
    }

    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Move selection to the next record, wrapping at the end.
    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        self.selected_index = (self.selected_index + 1) % len;
    }

    /// Move selection to the previous record, wrapping to the end.
    pub fn select_previous(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = len - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    pub fn select_last(&mut self, len: usize) {
        self.selected_index = len.saturating_sub(1);
    }

    /// Keep the selection inside a collection of `len` records.
    pub fn clamp_selection(&mut self, len: usize) {
        if self.selected_index >= len {
            self.selected_index = len.saturating_sub(1);
        }
    }

    /// The selected record, if the collection is not empty.
    pub fn selected<'a>(&self, notifications: &'a [Notification]) -> Option<&'a Notification> {
        notifications.get(self.selected_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_wraps_in_both_directions() {
        let mut state = NotificationPanelState::default();
        state.select_previous(3);
        assert_eq!(state.selected_index(), 2);
        state.select_next(3);
        assert_eq!(state.selected_index(), 0);
    }

    #[test]
    fn empty_collection_keeps_selection_at_zero() {
        let mut state = NotificationPanelState::default();
        state.select_next(0);
        state.select_previous(0);
        state.clamp_selection(0);
        assert_eq!(state.selected_index(), 0);
        assert!(state.selected(&[]).is_none());
    }

    #[test]
    fn toggle_reopens_at_the_top() {
        let mut state = NotificationPanelState::default();
        state.toggle();
        state.select_next(3);
        state.toggle();
        assert!(!state.is_open());
        state.toggle();
        assert!(state.is_open());
        assert_eq!(state.selected_index(), 0);
    }
}
