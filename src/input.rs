use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// Keys currently held down, read synchronously by every game update.
///
/// Terminals that report key releases drive the set exactly. Terminals that
/// only report presses get an expiry window instead: auto-repeat keeps a held
/// key alive, and it drops out `hold_ticks` frames after the last press.
pub struct KeySet {
    held: HashMap<KeyCode, u64>,
    tick: u64,
    hold_ticks: u64,
    release_events: bool,
}

impl KeySet {
    pub fn new(hold_ticks: u64) -> Self {
        Self {
            held: HashMap::new(),
            tick: 0,
            hold_ticks: hold_ticks.max(1),
            release_events: false,
        }
    }

    /// Feed a raw key event. Returns true for a fresh press, which is the
    /// only kind that should trigger one-shot actions.
    pub fn observe(&mut self, key: &KeyEvent) -> bool {
        match key.kind {
            KeyEventKind::Press => {
                self.press(key.code);
                true
            }
            KeyEventKind::Repeat => {
                self.press(key.code);
                false
            }
            KeyEventKind::Release => {
                self.release(key.code);
                false
            }
        }
    }

    pub fn press(&mut self, code: KeyCode) {
        self.held.insert(fold(code), self.tick + self.hold_ticks);
    }

    pub fn release(&mut self, code: KeyCode) {
        if !self.release_events {
            log::debug!("terminal reports key releases, disabling hold expiry");
            self.release_events = true;
        }
        self.held.remove(&fold(code));
    }

    /// Advance one frame, expiring stale keys when releases are not reported.
    pub fn advance(&mut self) {
        self.tick += 1;
        if !self.release_events {
            let tick = self.tick;
            self.held.retain(|_, expires| *expires > tick);
        }
    }

    pub fn is_down(&self, code: KeyCode) -> bool {
        self.held.contains_key(&fold(code))
    }

    pub fn clear(&mut self) {
        self.held.clear();
    }
}

fn fold(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

/// One player's movement and action bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub up: KeyCode,
    pub down: KeyCode,
    pub left: KeyCode,
    pub right: KeyCode,
    pub action: KeyCode,
}

impl Controls {
    pub const WASD_E: Controls = Controls {
        up: KeyCode::Char('w'),
        down: KeyCode::Char('s'),
        left: KeyCode::Char('a'),
        right: KeyCode::Char('d'),
        action: KeyCode::Char('e'),
    };

    pub const IJKL_O: Controls = Controls {
        up: KeyCode::Char('i'),
        down: KeyCode::Char('k'),
        left: KeyCode::Char('j'),
        right: KeyCode::Char('l'),
        action: KeyCode::Char('o'),
    };

    pub const ARROWS: Controls = Controls {
        up: KeyCode::Up,
        down: KeyCode::Down,
        left: KeyCode::Left,
        right: KeyCode::Right,
        action: KeyCode::Char(' '),
    };

    /// Movement intent as -1/0/1 per axis. Opposing keys cancel out.
    pub fn axis(&self, keys: &KeySet) -> (f32, f32) {
        let mut x = 0.0;
        let mut y = 0.0;
        if keys.is_down(self.left) {
            x -= 1.0;
        }
        if keys.is_down(self.right) {
            x += 1.0;
        }
        if keys.is_down(self.up) {
            y -= 1.0;
        }
        if keys.is_down(self.down) {
            y += 1.0;
        }
        (x, y)
    }

    pub fn action_down(&self, keys: &KeySet) -> bool {
        keys.is_down(self.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn event(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
        KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind)
    }

    #[test]
    fn test_press_expires_without_release_support() {
        let mut keys = KeySet::new(3);
        assert!(keys.observe(&event(KeyCode::Char('w'), KeyEventKind::Press)));
        for _ in 0..2 {
            keys.advance();
            assert!(keys.is_down(KeyCode::Char('w')));
        }
        keys.advance();
        assert!(!keys.is_down(KeyCode::Char('w')));
    }

    #[test]
    fn test_release_events_disable_expiry() {
        let mut keys = KeySet::new(1);
        keys.observe(&event(KeyCode::Char('x'), KeyEventKind::Press));
        keys.observe(&event(KeyCode::Char('x'), KeyEventKind::Release));
        keys.observe(&event(KeyCode::Up, KeyEventKind::Press));
        for _ in 0..100 {
            keys.advance();
        }
        assert!(keys.is_down(KeyCode::Up));
        keys.observe(&event(KeyCode::Up, KeyEventKind::Release));
        assert!(!keys.is_down(KeyCode::Up));
    }

    #[test]
    fn test_shift_does_not_change_binding() {
        let mut keys = KeySet::new(5);
        keys.press(KeyCode::Char('W'));
        assert!(keys.is_down(KeyCode::Char('w')));
        assert_eq!(Controls::WASD_E.axis(&keys), (0.0, -1.0));
    }

    #[test]
    fn test_opposing_keys_cancel() {
        let mut keys = KeySet::new(5);
        keys.press(KeyCode::Left);
        keys.press(KeyCode::Right);
        keys.press(KeyCode::Down);
        assert_eq!(Controls::ARROWS.axis(&keys), (0.0, 1.0));
    }

    #[test]
    fn test_repeat_is_not_a_fresh_press() {
        let mut keys = KeySet::new(5);
        assert!(!keys.observe(&event(KeyCode::Char(' '), KeyEventKind::Repeat)));
        assert!(keys.is_down(KeyCode::Char(' ')));
    }
}
