//! Keyboard selection over the candidate list.
//!
//! The navigator never touches rendering. It answers every key with a
//! [`NavOutcome`] and the controller forwards the active index to the
//! presentation layer.

/// Keys the search box forwards to the navigator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavKey {
    Up,
    Down,
    Enter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Key had no effect in the current state
    Ignored,
    /// Active index changed; `None` means nothing is highlighted
    Highlight(Option<usize>),
    /// Selection left the top of the list; focus goes back to the text field
    ReturnFocus,
    /// Commit the candidate at this index
    Commit(usize),
}

#[derive(Debug, Clone)]
pub struct KeyboardNavigator {
    selected: Option<usize>,
    len: usize,
    enabled: bool,
}

impl Default for KeyboardNavigator {
    fn default() -> Self {
        Self {
            selected: None,
            len: 0,
            enabled: true,
        }
    }
}

impl KeyboardNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Navigation is switched off while a fetch is in flight.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// A new candidate list replaced the old one.
    pub fn reset(&mut self, len: usize) {
        self.selected = None;
        self.len = len;
    }

    /// Drop the highlight without changing the list.
    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Pointer hover highlights a row directly.
    pub fn hover(&mut self, index: usize) -> NavOutcome {
        if !self.enabled || index >= self.len {
            return NavOutcome::Ignored;
        }
        self.selected = Some(index);
        NavOutcome::Highlight(self.selected)
    }

    pub fn handle(&mut self, key: NavKey) -> NavOutcome {
        if !self.enabled {
            return NavOutcome::Ignored;
        }

        match key {
            NavKey::Down => {
                if self.len == 0 {
                    return NavOutcome::Ignored;
                }
                let next = match self.selected {
                    None => 0,
                    Some(i) => (i + 1).min(self.len - 1),
                };
                self.selected = Some(next);
                NavOutcome::Highlight(self.selected)
            }
            NavKey::Up => match self.selected {
                None => NavOutcome::Ignored,
                Some(0) => {
                    self.selected = None;
                    NavOutcome::ReturnFocus
                }
                Some(i) => {
                    self.selected = Some(i - 1);
                    NavOutcome::Highlight(self.selected)
                }
            },
            NavKey::Enter => match self.selected {
                Some(i) => NavOutcome::Commit(i),
                None => NavOutcome::Ignored,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn navigator_with(len: usize) -> KeyboardNavigator {
        let mut navigator = KeyboardNavigator::new();
        navigator.reset(len);
        navigator
    }

    #[test]
    fn test_down_from_none_selects_first() {
        let mut navigator = navigator_with(3);
        assert_eq!(navigator.handle(NavKey::Down), NavOutcome::Highlight(Some(0)));
        assert_eq!(navigator.selected(), Some(0));
    }

    #[test]
    fn test_down_saturates_at_last_item() {
        let mut navigator = navigator_with(2);
        navigator.handle(NavKey::Down);
        navigator.handle(NavKey::Down);
        assert_eq!(navigator.handle(NavKey::Down), NavOutcome::Highlight(Some(1)));
        assert_eq!(navigator.selected(), Some(1));
    }

    #[test]
    fn test_down_on_empty_list_is_ignored() {
        let mut navigator = navigator_with(0);
        assert_eq!(navigator.handle(NavKey::Down), NavOutcome::Ignored);
        assert_eq!(navigator.selected(), None);
    }

    #[test]
    fn test_up_moves_back_then_returns_focus() {
        let mut navigator = navigator_with(3);
        navigator.handle(NavKey::Down);
        navigator.handle(NavKey::Down);

        assert_eq!(navigator.handle(NavKey::Up), NavOutcome::Highlight(Some(0)));
        assert_eq!(navigator.handle(NavKey::Up), NavOutcome::ReturnFocus);
        assert_eq!(navigator.selected(), None);
        assert_eq!(navigator.handle(NavKey::Up), NavOutcome::Ignored);
    }

    #[test]
    fn test_enter_commits_only_with_selection() {
        let mut navigator = navigator_with(3);
        assert_eq!(navigator.handle(NavKey::Enter), NavOutcome::Ignored);

        navigator.handle(NavKey::Down);
        navigator.handle(NavKey::Down);
        assert_eq!(navigator.handle(NavKey::Enter), NavOutcome::Commit(1));
    }

    #[test]
    fn test_reset_clears_selection() {
        let mut navigator = navigator_with(3);
        navigator.handle(NavKey::Down);
        navigator.reset(5);

        assert_eq!(navigator.selected(), None);
        assert_eq!(navigator.len(), 5);
    }

    #[test]
    fn test_disabled_navigator_ignores_keys() {
        let mut navigator = navigator_with(3);
        navigator.set_enabled(false);

        assert_eq!(navigator.handle(NavKey::Down), NavOutcome::Ignored);
        assert_eq!(navigator.hover(1), NavOutcome::Ignored);
        assert_eq!(navigator.selected(), None);

        navigator.set_enabled(true);
        assert_eq!(navigator.handle(NavKey::Down), NavOutcome::Highlight(Some(0)));
    }

    #[test]
    fn test_default_navigator_accepts_keys() {
        let mut navigator = KeyboardNavigator::default();
        navigator.reset(2);

        assert_eq!(navigator.handle(NavKey::Down), NavOutcome::Highlight(Some(0)));
        assert_eq!(navigator.hover(1), NavOutcome::Highlight(Some(1)));
    }

    #[test]
    fn test_hover_bounds() {
        let mut navigator = navigator_with(2);
        assert_eq!(navigator.hover(1), NavOutcome::Highlight(Some(1)));
        assert_eq!(navigator.hover(2), NavOutcome::Ignored);
        assert_eq!(navigator.selected(), Some(1));
    }
}
