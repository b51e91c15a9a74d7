use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::collections::HashMap;

/// Hard cap on simultaneous players per room.
pub const MAX_PLAYERS: usize = 4;

/// Authoritative per-player state, populated from client-reported input.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Player {
    pub id: String,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub hp: i32,
    pub is_host: bool,
}

impl Player {
    /// Creates a player at the spawn position with full health.
    pub fn new(id: String, name: String, is_host: bool) -> Self {
        Self {
            id,
            name,
            x: 0.0,
            y: 0.0,
            hp: 100,
            is_host,
        }
    }
}

/// An isolated game session: players, skill progression, wave counter and
/// the shared seed all clients derive procedural content from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub room_id: String,
    pub host_id: String,
    pub players: HashMap<String, Player>,
    pub skill_tree: HashMap<String, Number>,
    pub wave: u32,
    pub seed: u64,
}

impl Room {
    /// Creates a room with the creator registered as its sole, host player.
    pub fn new(room_id: String, seed: u64, host_id: String, host_name: String) -> Self {
        let mut players = HashMap::new();
        players.insert(
            host_id.clone(),
            Player::new(host_id.clone(), host_name, true),
        );

        Self {
            room_id,
            host_id,
            players,
            skill_tree: default_skill_tree(),
            wave: 1,
            seed,
        }
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    /// Check if room is at capacity (4 players)
    pub fn is_full(&self) -> bool {
        self.players.len() >= MAX_PLAYERS
    }

    pub fn has_player(&self, player_id: &str) -> bool {
        self.players.contains_key(player_id)
    }

    pub fn is_host(&self, player_id: &str) -> bool {
        self.host_id == player_id
    }

    /// Connection ids of every player in the room.
    pub fn member_ids(&self) -> Vec<String> {
        self.players.keys().cloned().collect()
    }

    /// Connection ids of every player except `excluded`.
    pub fn member_ids_except(&self, excluded: &str) -> Vec<String> {
        self.players
            .keys()
            .filter(|id| id.as_str() != excluded)
            .cloned()
            .collect()
    }
}

/// Baseline skill levels every new room starts from.
pub fn default_skill_tree() -> HashMap<String, Number> {
    let mut tree = HashMap::new();
    tree.insert("damage".to_string(), Number::from(1));
    tree.insert("fireRate".to_string(), Number::from(1));
    tree.insert("speed".to_string(), Number::from(1));
    tree
}
