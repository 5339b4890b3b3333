//! Drawer state machine and focus-trap arithmetic, free of any DOM access.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrawerState {
    #[default]
    Closed,
    Open,
}

/// Why the drawer is closing. Only a forced close skips returning focus to
/// the toggle (the toggle is hidden on wide viewports).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CloseReason {
    Toggle,
    Overlay,
    CloseControl,
    Escape,
    LinkActivated,
    ViewportWidened,
}

/// Every observable flag the drawer drives. Derived from the state alone, so
/// open followed by close always lands back on the initial flags.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawerFlags {
    pub aria_expanded: bool,
    pub open_marker: bool,
    pub overlay_visible: bool,
    pub scroll_locked: bool,
    pub key_trap_installed: bool,
}

impl DrawerState {
    pub fn is_open(self) -> bool {
        self == DrawerState::Open
    }

    pub fn flags(self) -> DrawerFlags {
        let open = self.is_open();
        DrawerFlags {
            aria_expanded: open,
            open_marker: open,
            overlay_visible: open,
            scroll_locked: open,
            key_trap_installed: open,
        }
    }
}

/// Side effects the DOM layer must apply after a state change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Transition {
    Opened,
    Closed { restore_focus: bool },
}

impl Transition {
    pub fn target(self) -> DrawerState {
        match self {
            Transition::Opened => DrawerState::Open,
            Transition::Closed { .. } => DrawerState::Closed,
        }
    }
}

/// Owns the state; every transition goes through here.
#[derive(Clone, Debug, Default)]
pub struct DrawerMachine {
    state: DrawerState,
}

impl DrawerMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DrawerState {
        self.state
    }

    /// `None` if already open.
    pub fn open(&mut self) -> Option<Transition> {
        if self.state.is_open() {
            return None;
        }
        self.state = DrawerState::Open;
        Some(Transition::Opened)
    }

    /// `None` if already closed.
    pub fn close(&mut self, reason: CloseReason) -> Option<Transition> {
        if !self.state.is_open() {
            return None;
        }
        self.state = DrawerState::Closed;
        Some(Transition::Closed { restore_focus: reason != CloseReason::ViewportWidened })
    }

    pub fn toggle(&mut self) -> Option<Transition> {
        match self.state {
            DrawerState::Closed => self.open(),
            DrawerState::Open => self.close(CloseReason::Toggle),
        }
    }
}

/// Where focus goes when the drawer opens, in preference order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InitialFocus {
    FirstFocusable,
    CloseControl,
    Toggle,
}

pub fn initial_focus(focusable_count: usize, has_close_control: bool) -> InitialFocus {
    if focusable_count > 0 {
        InitialFocus::FirstFocusable
    } else if has_close_control {
        InitialFocus::CloseControl
    } else {
        InitialFocus::Toggle
    }
}

/// Keys the trap reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrapKey {
    Escape,
    Tab { backwards: bool },
    Other,
}

impl TrapKey {
    pub fn from_key(key: &str, shift: bool) -> Self {
        match key {
            "Escape" | "Esc" => TrapKey::Escape,
            "Tab" => TrapKey::Tab { backwards: shift },
            _ => TrapKey::Other,
        }
    }
}

/// Index the trap must move focus to for a Tab press, or `None` when the
/// browser's own tab order already stays inside the drawer.
///
/// `active` is the position of the focused element among the drawer's
/// focusables (`None` when focus is elsewhere).
pub fn wrap_target(active: Option<usize>, len: usize, backwards: bool) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let last = len - 1;
    match (active, backwards) {
        (None, false) => Some(0),
        (None, true) => Some(last),
        (Some(i), false) if i >= last => Some(0),
        (Some(0), true) => Some(last),
        _ => None,
    }
}

/// What a drawer link does once the drawer has started closing.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkAction<T> {
    ScrollTo(T),
    Navigate(String),
    Stay,
}

/// An in-page target wins; otherwise follow `href` unless it is empty or `#`.
pub fn link_action<T>(target: Option<T>, href: Option<&str>) -> LinkAction<T> {
    if let Some(target) = target {
        return LinkAction::ScrollTo(target);
    }
    match href {
        Some(h) if !h.is_empty() && h != "#" => LinkAction::Navigate(h.to_string()),
        _ => LinkAction::Stay,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_then_close_restores_flags() {
        let mut m = DrawerMachine::new();
        let before = m.state().flags();
        assert_eq!(m.open(), Some(Transition::Opened));
        assert!(m.state().flags().key_trap_installed);
        assert_eq!(m.close(CloseReason::Overlay), Some(Transition::Closed { restore_focus: true }));
        assert_eq!(m.state().flags(), before);
    }

    #[test]
    fn redundant_transitions_are_ignored() {
        let mut m = DrawerMachine::new();
        assert_eq!(m.close(CloseReason::Escape), None);
        m.open();
        assert_eq!(m.open(), None);
    }

    #[test]
    fn toggle_alternates() {
        let mut m = DrawerMachine::new();
        assert_eq!(m.toggle().map(Transition::target), Some(DrawerState::Open));
        assert_eq!(m.toggle().map(Transition::target), Some(DrawerState::Closed));
    }

    #[test]
    fn forced_close_keeps_focus_where_it_is() {
        let mut m = DrawerMachine::new();
        m.open();
        assert_eq!(
            m.close(CloseReason::ViewportWidened),
            Some(Transition::Closed { restore_focus: false })
        );
    }

    #[test]
    fn initial_focus_preference() {
        assert_eq!(initial_focus(3, true), InitialFocus::FirstFocusable);
        assert_eq!(initial_focus(0, true), InitialFocus::CloseControl);
        assert_eq!(initial_focus(0, false), InitialFocus::Toggle);
    }

    #[test]
    fn trap_wraps_at_both_ends() {
        assert_eq!(wrap_target(Some(1), 2, false), Some(0));
        assert_eq!(wrap_target(Some(0), 2, true), Some(1));
        assert_eq!(wrap_target(Some(0), 2, false), None);
        assert_eq!(wrap_target(Some(1), 2, true), None);
    }

    #[test]
    fn trap_pulls_stray_focus_back_in() {
        assert_eq!(wrap_target(None, 3, false), Some(0));
        assert_eq!(wrap_target(None, 3, true), Some(2));
        assert_eq!(wrap_target(None, 0, false), None);
    }

    #[test]
    fn single_focusable_always_wraps_to_itself() {
        assert_eq!(wrap_target(Some(0), 1, false), Some(0));
        assert_eq!(wrap_target(Some(0), 1, true), Some(0));
    }

    #[test]
    fn key_mapping() {
        assert_eq!(TrapKey::from_key("Escape", false), TrapKey::Escape);
        assert_eq!(TrapKey::from_key("Tab", true), TrapKey::Tab { backwards: true });
        assert_eq!(TrapKey::from_key("a", false), TrapKey::Other);
    }

    #[test]
    fn link_prefers_in_page_target() {
        assert_eq!(link_action(Some(7), Some("/about")), LinkAction::ScrollTo(7));
        assert_eq!(link_action::<u8>(None, Some("/about")), LinkAction::Navigate("/about".into()));
        assert_eq!(link_action::<u8>(None, Some("#")), LinkAction::Stay);
        assert_eq!(link_action::<u8>(None, None), LinkAction::Stay);
    }
}
