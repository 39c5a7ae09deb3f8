use glam::Vec2;
use std::collections::HashSet;

/// Keys the scene reacts to.
///
/// Window backends translate their own key codes into these; unmapped keys
/// are simply never pressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    W,
    A,
    S,
    D,
    Space,
    X,
    Shift,
    Escape,
}

/// Keyboard and pointer state for the current frame.
///
/// The window layer feeds events in through [`press`](Self::press),
/// [`release`](Self::release) and [`add_pointer_delta`](Self::add_pointer_delta);
/// [`begin_frame`](Self::begin_frame) resets the per-frame pointer delta.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keys_down: HashSet<Key>,
    pointer_delta: Vec2,
    look_held: bool,
    keyboard_captured: bool,
    pointer_captured: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset per-frame accumulators. Held keys persist.
    pub fn begin_frame(&mut self) {
        self.pointer_delta = Vec2::ZERO;
    }

    pub fn press(&mut self, key: Key) {
        self.keys_down.insert(key);
    }

    pub fn release(&mut self, key: Key) {
        self.keys_down.remove(&key);
    }

    /// Accumulate pointer motion since the last [`begin_frame`](Self::begin_frame).
    pub fn add_pointer_delta(&mut self, delta: Vec2) {
        self.pointer_delta += delta;
    }

    /// Whether the look button (left mouse) is held.
    pub fn set_look_held(&mut self, held: bool) {
        self.look_held = held;
    }

    /// Mark devices as owned by the debug overlay for this frame.
    pub fn set_capture(&mut self, keyboard: bool, pointer: bool) {
        if keyboard != self.keyboard_captured || pointer != self.pointer_captured {
            tracing::trace!(keyboard, pointer, "input capture changed");
        }
        self.keyboard_captured = keyboard;
        self.pointer_captured = pointer;
    }

    /// Returns true if the key is held and the keyboard is not captured.
    pub fn key_down(&self, key: Key) -> bool {
        !self.keyboard_captured && self.keys_down.contains(&key)
    }

    /// Pointer movement this frame, zero while the pointer is captured.
    pub fn pointer_delta(&self) -> Vec2 {
        if self.pointer_captured {
            Vec2::ZERO
        } else {
            self.pointer_delta
        }
    }

    /// Returns true if the look button is held and the pointer is not captured.
    pub fn look_held(&self) -> bool {
        !self.pointer_captured && self.look_held
    }
}
