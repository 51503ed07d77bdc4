use cadence_hook::Hook;
use glam::Vec2;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::Arc;

use crate::keycode::KeyCode;

#[derive(Debug, Default)]
struct InputState {
    down: HashSet<KeyCode>,
    mouse_position: Vec2,
}

/// A group of keys observed together, e.g. `[W, Up]` for "move up".
///
/// Created by [`InputService::register_input_hook`]. Clones share state and hooks.
#[derive(Debug, Clone)]
pub struct InputHook {
    keys: Arc<[KeyCode]>,
    state: Arc<RwLock<InputState>>,
    /// Fired with the key that went down.
    pub down: Hook<KeyCode>,
    /// Fired with the key that came up.
    pub up: Hook<KeyCode>,
}

impl InputHook {
    /// The bound keys, in registration order.
    pub fn keys(&self) -> &[KeyCode] {
        &self.keys
    }

    /// True while any bound key is held.
    pub fn is_down(&self) -> bool {
        let state = self.state.read();
        self.keys.iter().any(|k| state.down.contains(k))
    }

    fn binds(&self, key: KeyCode) -> bool {
        self.keys.contains(&key)
    }
}

/// Keyboard and mouse state, fed by the host through `press`/`release`.
#[derive(Debug)]
pub struct InputService {
    state: Arc<RwLock<InputState>>,
    hooks: Vec<InputHook>,
    shift: InputHook,
}

impl Default for InputService {
    fn default() -> Self {
        Self::new()
    }
}

impl InputService {
    pub fn new() -> Self {
        let state = Arc::new(RwLock::new(InputState::default()));
        let shift = InputHook {
            keys: Arc::from(KeyCode::SHIFT.as_slice()),
            state: Arc::clone(&state),
            down: Hook::new(),
            up: Hook::new(),
        };
        Self {
            state,
            hooks: vec![shift.clone()],
            shift,
        }
    }

    /// Observe `keys` as one group.
    pub fn register_input_hook(&mut self, keys: &[KeyCode]) -> InputHook {
        let hook = InputHook {
            keys: Arc::from(keys),
            state: Arc::clone(&self.state),
            down: Hook::new(),
            up: Hook::new(),
        };
        self.hooks.push(hook.clone());
        hook
    }

    /// The built-in hook over both shift keys.
    pub fn shift(&self) -> &InputHook {
        &self.shift
    }

    /// Whether this exact key code is held. Shifted symbols are distinct codes.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.state.read().down.contains(&key)
    }

    /// Every held key, sorted.
    pub fn keys_down(&self) -> Vec<KeyCode> {
        let mut keys: Vec<_> = self.state.read().down.iter().copied().collect();
        keys.sort();
        keys
    }

    /// Record a key press. Digits become their shifted symbol while shift is
    /// held. Repeated presses of a held key fire nothing.
    pub fn press(&mut self, key: KeyCode) {
        let key = if self.shift.is_down() {
            key.shifted().unwrap_or(key)
        } else {
            key
        };
        let newly_down = self.state.write().down.insert(key);
        if newly_down {
            tracing::trace!(?key, "key down");
            self.fire(key, |h| &h.down);
        }
    }

    /// Record a key release. Both the plain and shifted form of a digit are
    /// released, so letting go of shift first never leaves a symbol stuck down.
    pub fn release(&mut self, key: KeyCode) {
        let released: Vec<KeyCode> = {
            let mut state = self.state.write();
            [Some(key), key.shifted()]
                .into_iter()
                .flatten()
                .filter(|k| state.down.remove(k))
                .collect()
        };
        for key in released {
            tracing::trace!(?key, "key up");
            self.fire(key, |h| &h.up);
        }
    }

    /// Press and immediately release a mouse-wheel notch.
    pub fn scroll(&mut self, delta_y: f32) {
        let key = if delta_y > 0.0 {
            KeyCode::WheelDown
        } else {
            KeyCode::WheelUp
        };
        self.press(key);
        self.release(key);
    }

    /// Last position reported by the host, in screen pixels.
    pub fn mouse_position(&self) -> Vec2 {
        self.state.read().mouse_position
    }

    pub fn set_mouse_position(&mut self, position: Vec2) {
        self.state.write().mouse_position = position;
    }

    /// Release everything, e.g. when the window loses focus.
    pub fn release_all(&mut self) {
        for key in self.keys_down() {
            self.release(key);
        }
    }

    // Called with no state lock held so callbacks may query `is_down`.
    fn fire(&self, key: KeyCode, which: impl Fn(&InputHook) -> &Hook<KeyCode>) {
        for hook in self.hooks.iter().filter(|h| h.binds(key)) {
            which(hook).fire(&key);
        }
    }
}
