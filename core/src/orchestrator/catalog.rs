//! Per-title configuration lookup
//!
//! Pure data: a game identifier maps to its default format descriptor and
//! total player count. No state beyond the table itself.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Default format for one game title
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameFormat {
    /// Format descriptor (e.g. "5v5")
    pub format: String,

    /// Total players a session of this format needs (e.g. 10 for 5v5)
    pub total_players: usize,
}

/// Lookup table from game identifier to default format
///
/// # Example
/// ```
/// use scrim_coordinator_core_rs::orchestrator::GameCatalog;
///
/// let catalog = GameCatalog::with_defaults();
/// let moba = catalog.lookup("moba").unwrap();
/// assert_eq!(moba.total_players, 10);
/// assert!(catalog.lookup("unknown_game").is_none());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameCatalog {
    games: HashMap<String, GameFormat>,
}

impl GameCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self {
            games: HashMap::new(),
        }
    }

    /// Create a catalog seeded with common formats
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        catalog.insert("moba".to_string(), "5v5".to_string(), 10);
        catalog.insert("fps".to_string(), "5v5".to_string(), 10);
        catalog.insert("brawler".to_string(), "3v3".to_string(), 6);
        catalog.insert("duel".to_string(), "1v1".to_string(), 2);
        catalog
    }

    /// Register or replace a game's default format
    pub fn insert(&mut self, game_id: String, format: String, total_players: usize) {
        self.games.insert(
            game_id,
            GameFormat {
                format,
                total_players,
            },
        );
    }

    /// Look up a game's default format
    pub fn lookup(&self, game_id: &str) -> Option<&GameFormat> {
        self.games.get(game_id)
    }

    /// Number of registered games
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Check if the catalog is empty
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}
