//! Keyboard and touch input merged into per-tick intents
//!
//! DOM listeners only flip flags here; the frame loop polls a `TickInput`
//! once per simulation step.

use crate::sim::TickInput;

/// A held action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Up,
    Down,
    Left,
    Right,
    Fire,
}

impl Intent {
    /// Map a `KeyboardEvent.key` value (WASD, arrows, space)
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "w" | "arrowup" => Some(Intent::Up),
            "s" | "arrowdown" => Some(Intent::Down),
            "a" | "arrowleft" => Some(Intent::Left),
            "d" | "arrowright" => Some(Intent::Right),
            " " | "spacebar" => Some(Intent::Fire),
            _ => None,
        }
    }

    /// Map a touch button's `data-direction` / `data-action` attribute
    pub fn from_touch(name: &str) -> Option<Self> {
        match name {
            "up" => Some(Intent::Up),
            "down" => Some(Intent::Down),
            "left" => Some(Intent::Left),
            "right" => Some(Intent::Right),
            "shoot" => Some(Intent::Fire),
            _ => None,
        }
    }
}

/// Held flags for one input source
#[derive(Debug, Clone, Copy, Default)]
struct Held {
    up: bool,
    down: bool,
    left: bool,
    right: bool,
    fire: bool,
}

impl Held {
    fn set(&mut self, intent: Intent, held: bool) {
        match intent {
            Intent::Up => self.up = held,
            Intent::Down => self.down = held,
            Intent::Left => self.left = held,
            Intent::Right => self.right = held,
            Intent::Fire => self.fire = held,
        }
    }
}

/// Keyboard + touch state; an intent is active if either source holds it
#[derive(Debug, Clone, Default)]
pub struct InputState {
    keyboard: Held,
    touch: Held,
    pause_requested: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the key is a game key (caller should `preventDefault`)
    pub fn key_down(&mut self, key: &str) -> bool {
        if matches!(key.to_lowercase().as_str(), "p" | "escape") {
            self.pause_requested = true;
            return true;
        }
        match Intent::from_key(key) {
            Some(intent) => {
                self.keyboard.set(intent, true);
                true
            }
            None => false,
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(intent) = Intent::from_key(key) {
            self.keyboard.set(intent, false);
        }
    }

    pub fn touch_start(&mut self, name: &str) {
        if let Some(intent) = Intent::from_touch(name) {
            self.touch.set(intent, true);
        }
    }

    /// Also used for `touchcancel`
    pub fn touch_end(&mut self, name: &str) {
        if let Some(intent) = Intent::from_touch(name) {
            self.touch.set(intent, false);
        }
    }

    pub fn request_pause(&mut self) {
        self.pause_requested = true;
    }

    /// Drop every held intent (window blur, tab hidden)
    pub fn release_all(&mut self) {
        self.keyboard = Held::default();
        self.touch = Held::default();
    }

    /// Snapshot for one tick. The pause request is consumed.
    pub fn poll(&mut self) -> TickInput {
        let (k, t) = (self.keyboard, self.touch);
        let input = TickInput {
            up: k.up || t.up,
            down: k.down || t.down,
            left: k.left || t.left,
            right: k.right || t.right,
            fire: k.fire || t.fire,
            pause: self.pause_requested,
        };
        self.pause_requested = false;
        input
    }
}
