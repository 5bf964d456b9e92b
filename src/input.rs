use std::collections::HashSet;

use anyhow::{anyhow, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::animation::Controls;

/// Identifier for a physical keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Named(NamedKey),
    Character(char),
    Digit(u8),
    Function(u8),
}

impl KeyCode {
    pub fn from_name(name: &str) -> Option<Self> {
        if let Some(key) = parse_named_key(name) {
            return Some(key);
        }
        let mut chars = name.chars();
        if let (Some(ch), None) = (chars.next(), chars.next()) {
            if ch.is_ascii_alphabetic() {
                return Some(Self::Character(ch.to_ascii_uppercase()));
            }
            if ch.is_ascii_digit() {
                return Some(Self::Digit(ch as u8 - b'0'));
            }
        }
        if let Some(function) = name.strip_prefix('F').or_else(|| name.strip_prefix('f')) {
            if let Ok(index) = function.parse::<u8>() {
                if (1..=25).contains(&index) {
                    return Some(Self::Function(index));
                }
            }
        }
        None
    }
}

fn parse_named_key(name: &str) -> Option<KeyCode> {
    use NamedKey::*;
    let key = match name {
        "Space" => Space,
        "Enter" | "Return" => Enter,
        "Tab" => Tab,
        "Left" | "ArrowLeft" => Left,
        "Right" | "ArrowRight" => Right,
        "Up" | "ArrowUp" => Up,
        "Down" | "ArrowDown" => Down,
        "Escape" | "Esc" => Escape,
        "Backspace" => Backspace,
        "LeftShift" | "LShift" => LeftShift,
        "RightShift" | "RShift" => RightShift,
        _ => return None,
    };
    Some(KeyCode::Named(key))
}

/// Friendly names for the non-printing keys the runtime understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedKey {
    Space,
    Enter,
    Tab,
    Left,
    Right,
    Up,
    Down,
    Escape,
    Backspace,
    LeftShift,
    RightShift,
}

/// Keys bound to the four logical movement commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub cube_up: KeyCode,
    pub cube_down: KeyCode,
    pub camera_left: KeyCode,
    pub camera_right: KeyCode,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            cube_up: KeyCode::Character('W'),
            cube_down: KeyCode::Character('S'),
            camera_left: KeyCode::Character('A'),
            camera_right: KeyCode::Character('D'),
        }
    }
}

impl KeyBindings {
    /// Parses a binding by key name, e.g. `"W"` or `"ArrowUp"`.
    pub fn parse_key(name: &str) -> Result<KeyCode> {
        KeyCode::from_name(name.trim()).ok_or_else(|| anyhow!("unknown key name `{name}`"))
    }
}

/// Thread-safe set of currently held keys.
#[derive(Debug, Default)]
pub struct InputState {
    keys: RwLock<HashSet<KeyCode>>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key_down(&self, key: KeyCode) {
        self.keys.write().insert(key);
    }

    pub fn set_key_up(&self, key: KeyCode) {
        self.keys.write().remove(&key);
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.read().contains(&key)
    }

    /// Releases every key, e.g. when the window loses focus.
    pub fn clear(&self) {
        self.keys.write().clear();
    }

    /// Samples the movement commands for the current frame.
    pub fn controls(&self, bindings: &KeyBindings) -> Controls {
        Controls {
            cube_up: self.is_key_down(bindings.cube_up),
            cube_down: self.is_key_down(bindings.cube_down),
            camera_left: self.is_key_down(bindings.camera_left),
            camera_right: self.is_key_down(bindings.camera_right),
        }
    }
}
