//! Hotkey dispatch: turns raw key traffic into session triggers.
//!
//! A chord fires exactly once per physical activation: the tracker remembers
//! that a binding fired and will not fire it again until at least one of its
//! keys has been released. When several bindings are satisfied by the same
//! press, the first one in declaration order wins.

use crate::backend::RawInput;
use crate::log::KeySym;
use crate::session::Trigger;
use std::collections::HashSet;

#[derive(Debug, Clone)]
pub struct HotkeyBinding {
    pub keys: HashSet<KeySym>,
    pub trigger: Trigger,
}

impl HotkeyBinding {
    pub fn new(keys: impl IntoIterator<Item = KeySym>, trigger: Trigger) -> Self {
        Self {
            keys: keys.into_iter().collect(),
            trigger,
        }
    }
}

/// The default bindings: Shift+E toggles recording, Shift+W plays, and
/// Ctrl+Shift+Q (either ctrl) force-quits.
pub fn default_bindings() -> Vec<HotkeyBinding> {
    vec![
        HotkeyBinding::new([KeySym::Shift, KeySym::Char('e')], Trigger::ToggleRecord),
        HotkeyBinding::new([KeySym::Shift, KeySym::Char('w')], Trigger::Play),
        HotkeyBinding::new(
            [KeySym::CtrlL, KeySym::Shift, KeySym::Char('q')],
            Trigger::ForceQuit,
        ),
        HotkeyBinding::new(
            [KeySym::CtrlR, KeySym::Shift, KeySym::Char('q')],
            Trigger::ForceQuit,
        ),
    ]
}

/// The key sets the recorder must keep out of its logs.
pub fn suppression_sets(bindings: &[HotkeyBinding]) -> Vec<HashSet<KeySym>> {
    bindings.iter().map(|b| b.keys.clone()).collect()
}

pub struct ChordTracker {
    bindings: Vec<HotkeyBinding>,
    fired: Vec<bool>,
    pressed: HashSet<KeySym>,
}

impl ChordTracker {
    pub fn new(bindings: Vec<HotkeyBinding>) -> Self {
        let fired = vec![false; bindings.len()];
        Self {
            bindings,
            fired,
            pressed: HashSet::new(),
        }
    }

    /// Feed one raw notification; returns a trigger when a chord completes.
    pub fn update(&mut self, raw: &RawInput) -> Option<Trigger> {
        match raw {
            RawInput::KeyPress(key) => {
                self.pressed.insert(key.clone());
                for (i, binding) in self.bindings.iter().enumerate() {
                    if !self.fired[i] && binding.keys.is_subset(&self.pressed) {
                        self.fired[i] = true;
                        tracing::debug!(trigger = ?binding.trigger, "hotkey chord fired");
                        return Some(binding.trigger);
                    }
                }
                None
            }
            RawInput::KeyRelease(key) => {
                self.pressed.remove(key);
                for (i, binding) in self.bindings.iter().enumerate() {
                    if self.fired[i] && !binding.keys.is_subset(&self.pressed) {
                        self.fired[i] = false;
                    }
                }
                None
            }
            _ => None,
        }
    }
}
