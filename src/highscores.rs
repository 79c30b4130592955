//! Best-score tracking
//!
//! A single number persisted to LocalStorage. Native builds keep it in memory only.

use serde::{Deserialize, Serialize};

/// Best score across sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "tile_dash_high_score";

    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// Record a finished run's score. Returns true if it set a new best.
    pub fn submit(&mut self, score: u64) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Parse a stored value; anything unreadable counts as no score yet
    pub fn from_stored(raw: &str) -> Self {
        match serde_json::from_str::<u64>(raw.trim()) {
            Ok(best) => Self { best },
            Err(e) => {
                log::warn!("Ignoring unreadable high score {:?}: {}", raw, e);
                Self::default()
            }
        }
    }

    /// Load the best score from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(raw)) = storage.get_item(Self::STORAGE_KEY) {
                let score = Self::from_stored(&raw);
                log::info!("Loaded high score {}", score.best);
                return score;
            }
        }

        log::info!("No high score found, starting fresh");
        Self::default()
    }

    /// Save the best score to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(raw) = serde_json::to_string(&self.best) {
                let _ = storage.set_item(Self::STORAGE_KEY, &raw);
                log::info!("High score saved ({})", self.best);
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
