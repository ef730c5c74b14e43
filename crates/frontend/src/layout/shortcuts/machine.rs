use super::keymap::{self, Action, SequenceWindow};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SequenceState {
    Idle,
    Pending { starter: char, deadline_ms: f64 },
}

/// What a keypress produced
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dispatch {
    /// In order: a pending expiry action first, then the key's own action
    pub actions: Vec<Action>,
    /// The key belonged to a shortcut and should not reach the page
    pub consumed: bool,
}

/// Two-key sequence buffer driven by [`keymap`].
///
/// Time is passed in explicitly so the machine can be tested without a clock.
#[derive(Debug)]
pub struct ShortcutMachine {
    state: SequenceState,
    default_window_ms: f64,
    supplier_window_ms: f64,
}

impl ShortcutMachine {
    pub fn new(default_window_ms: f64, supplier_window_ms: f64) -> Self {
        Self {
            state: SequenceState::Idle,
            default_window_ms,
            supplier_window_ms,
        }
    }

    pub fn state(&self) -> SequenceState {
        self.state
    }

    pub fn deadline_ms(&self) -> Option<f64> {
        match self.state {
            SequenceState::Pending { deadline_ms, .. } => Some(deadline_ms),
            SequenceState::Idle => None,
        }
    }

    fn window_ms(&self, window: SequenceWindow) -> f64 {
        match window {
            SequenceWindow::Default => self.default_window_ms,
            SequenceWindow::Supplier => self.supplier_window_ms,
        }
    }

    /// Drop an expired sequence, returning its expiry action if any.
    pub fn expire(&mut self, now_ms: f64) -> Option<Action> {
        let SequenceState::Pending { starter, deadline_ms } = self.state else {
            return None;
        };
        if now_ms < deadline_ms {
            return None;
        }
        self.state = SequenceState::Idle;
        keymap::starter(starter).and_then(|s| s.on_expiry)
    }

    /// Feed one Alt+`key` press.
    pub fn press(&mut self, key: char, now_ms: f64) -> Dispatch {
        let mut dispatch = Dispatch::default();
        if let Some(action) = self.expire(now_ms) {
            dispatch.actions.push(action);
        }

        if let SequenceState::Pending { starter, .. } = self.state {
            self.state = SequenceState::Idle;
            if let Some(path) = keymap::route(starter, key) {
                dispatch.actions.push(Action::Navigate(path));
                dispatch.consumed = true;
                return dispatch;
            }
        }

        if let Some(action) = keymap::direct(key) {
            dispatch.actions.push(action);
            dispatch.consumed = true;
        } else if let Some(starter) = keymap::starter(key) {
            self.state = SequenceState::Pending {
                starter: key,
                deadline_ms: now_ms + self.window_ms(starter.window),
            };
            dispatch.consumed = true;
        }
        dispatch
    }

    pub fn reset(&mut self) {
        self.state = SequenceState::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn machine() -> ShortcutMachine {
        ShortcutMachine::new(1500.0, 800.0)
    }

    fn nav(path: &'static str) -> Vec<Action> {
        vec![Action::Navigate(path)]
    }

    #[test]
    fn test_sequence_within_window() {
        let mut m = machine();
        let first = m.press('p', 0.0);
        assert!(first.consumed);
        assert!(first.actions.is_empty());
        assert_eq!(m.press('i', 1000.0).actions, nav("/invoices/"));
        assert_eq!(m.state(), SequenceState::Idle);
    }

    #[test]
    fn test_sequence_after_window_falls_back_to_single_key() {
        let mut m = machine();
        m.press('p', 0.0);
        assert_eq!(m.press('i', 2000.0).actions, nav("/inventory"));
    }

    #[test]
    fn test_window_boundary_is_exclusive() {
        let mut m = machine();
        m.press('p', 0.0);
        assert_eq!(m.press('i', 1499.0).actions, nav("/invoices/"));
        m.press('p', 0.0);
        assert_eq!(m.press('i', 1500.0).actions, nav("/inventory"));
    }

    #[test]
    fn test_lone_supplier_key_expires_to_supplier_list() {
        let mut m = machine();
        m.press('s', 0.0);
        assert_eq!(m.deadline_ms(), Some(800.0));
        assert_eq!(m.expire(799.0), None);
        assert_eq!(m.expire(800.0), Some(Action::Navigate("/suppliers/")));
        assert_eq!(m.state(), SequenceState::Idle);
        assert_eq!(m.expire(900.0), None);
    }

    #[test]
    fn test_supplier_sequence_completes_before_expiry() {
        let mut m = machine();
        m.press('s', 0.0);
        assert_eq!(m.press('n', 500.0).actions, nav("/sales/add-with-products/"));
        assert_eq!(m.expire(1000.0), None);
    }

    #[test]
    fn test_expiry_fires_before_next_key() {
        let mut m = machine();
        m.press('s', 0.0);
        let d = m.press('c', 900.0);
        assert_eq!(
            d.actions,
            vec![Action::Navigate("/suppliers/"), Action::Navigate("/customers/")]
        );
    }

    #[test]
    fn test_completion_beats_starter_meaning() {
        let mut m = machine();
        m.press('r', 0.0);
        assert_eq!(m.press('p', 100.0).actions, nav("/reports/purchase/"));
        m.press('f', 0.0);
        assert_eq!(m.press('p', 100.0).actions, nav("/payments/"));
        m.press('s', 0.0);
        assert_eq!(m.press('p', 100.0).actions, nav("/receipts/"));
        m.press('a', 0.0);
        assert_eq!(m.press('d', 100.0).actions, nav("/register/"));
    }

    #[test]
    fn test_conflicting_key_clears_buffer() {
        let mut m = machine();
        m.press('p', 0.0);
        let d = m.press('z', 100.0);
        assert!(!d.consumed);
        assert!(d.actions.is_empty());
        assert_eq!(m.state(), SequenceState::Idle);
    }

    #[test]
    fn test_unmatched_starter_restarts_sequence() {
        let mut m = machine();
        m.press('p', 0.0);
        // b does not complete p, so it starts its own sequence
        assert!(m.press('b', 100.0).consumed);
        assert_eq!(m.press('r', 200.0).actions, nav("/rates/"));
    }

    #[test]
    fn test_direct_shortcuts() {
        let mut m = machine();
        assert_eq!(m.press('q', 0.0).actions, vec![Action::ToggleSidebar]);
        assert_eq!(m.press('c', 0.0).actions, nav("/customers/"));
        assert_eq!(m.press('l', 0.0).actions, nav("/logout/"));
        assert_eq!(m.press('d', 0.0).actions, nav("/"));
    }
}
