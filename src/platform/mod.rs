//! Platform input layer
//!
//! Maps browser key names to simulation input. Held keys become a
//! [`TickInput`] sampled once per tick; one-shot actions (start, restart,
//! pause) are decided here at the event boundary and never reach `tick`.

use std::collections::HashSet;

use crate::sim::{GamePhase, GameState, TickInput};

/// A simulation control bound to one or more keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Left,
    Right,
    Jump,
    Fire,
}

impl Control {
    /// Accepts both `KeyboardEvent.key` and `KeyboardEvent.code` names
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" | "KeyA" => Some(Control::Left),
            "ArrowRight" | "d" | "D" | "KeyD" => Some(Control::Right),
            "ArrowUp" | "w" | "W" | "KeyW" | " " | "Space" => Some(Control::Jump),
            "x" | "X" | "KeyX" => Some(Control::Fire),
            _ => None,
        }
    }
}

/// Set of keys currently held down
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<String>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: &str) {
        self.held.insert(key.to_string());
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.remove(key);
    }

    /// Forget everything (window lost focus, so key-ups may never arrive)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, control: Control) -> bool {
        self.held
            .iter()
            .any(|key| Control::from_key(key) == Some(control))
    }

    /// Snapshot of the held controls for one tick
    pub fn tick_input(&self) -> TickInput {
        TickInput {
            left: self.is_held(Control::Left),
            right: self.is_held(Control::Right),
            jump: self.is_held(Control::Jump),
            fire: self.is_held(Control::Fire),
        }
    }
}

/// Keys whose browser default (scrolling) should be suppressed
pub fn is_game_key(key: &str) -> bool {
    matches!(
        key,
        " " | "Space" | "ArrowUp" | "ArrowDown" | "ArrowLeft" | "ArrowRight"
    )
}

/// Mute toggle; handled by the front end, never by the simulation
pub fn is_mute_key(key: &str) -> bool {
    matches!(key, "m" | "M" | "KeyM")
}

/// Edge-triggered session actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeAction {
    Start,
    Restart,
    TogglePause,
}

impl EdgeAction {
    pub fn apply(self, state: &mut GameState) {
        match self {
            EdgeAction::Start => state.start_game(),
            EdgeAction::Restart => state.restart(),
            EdgeAction::TogglePause => state.toggle_pause(),
        }
    }
}

/// Action triggered by a key press in the given phase
pub fn edge_action(phase: GamePhase, key: &str) -> Option<EdgeAction> {
    let confirm = matches!(key, " " | "Space" | "Enter");
    let pause = matches!(key, "p" | "P" | "KeyP");
    match phase {
        GamePhase::Menu if confirm => Some(EdgeAction::Start),
        GamePhase::GameOver if confirm => Some(EdgeAction::Restart),
        GamePhase::Playing | GamePhase::Paused if pause => Some(EdgeAction::TogglePause),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_keys_map_to_input() {
        let mut keys = KeyState::new();
        keys.key_down("ArrowLeft");
        keys.key_down("KeyX");
        let input = keys.tick_input();
        assert!(input.left && input.fire);
        assert!(!input.right && !input.jump);

        keys.key_up("ArrowLeft");
        assert!(!keys.tick_input().left);
    }

    #[test]
    fn test_alias_release_keeps_control_held() {
        let mut keys = KeyState::new();
        keys.key_down(" ");
        keys.key_down("w");
        keys.key_up(" ");
        assert!(keys.tick_input().jump);
        keys.clear();
        assert_eq!(keys.tick_input(), TickInput::default());
    }

    #[test]
    fn test_edge_actions() {
        assert_eq!(edge_action(GamePhase::Menu, "Enter"), Some(EdgeAction::Start));
        assert_eq!(edge_action(GamePhase::Menu, "p"), None);
        assert_eq!(
            edge_action(GamePhase::GameOver, " "),
            Some(EdgeAction::Restart)
        );
        assert_eq!(
            edge_action(GamePhase::Playing, "P"),
            Some(EdgeAction::TogglePause)
        );
        assert_eq!(
            edge_action(GamePhase::Paused, "p"),
            Some(EdgeAction::TogglePause)
        );
        // Space jumps while playing; it is not an edge action
        assert_eq!(edge_action(GamePhase::Playing, " "), None);
    }

    #[test]
    fn test_apply_start() {
        let mut state = GameState::new(3, 0);
        if let Some(action) = edge_action(state.phase, "Space") {
            action.apply(&mut state);
        }
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(is_game_key("ArrowDown"));
        assert!(!is_game_key("p"));
    }

    #[test]
    fn test_mute_key_is_not_a_control() {
        assert!(is_mute_key("m"));
        assert!(is_mute_key("KeyM"));
        assert!(!is_mute_key("n"));
        assert_eq!(Control::from_key("m"), None);
        assert_eq!(edge_action(GamePhase::Playing, "m"), None);
    }
}
