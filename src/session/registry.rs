use serde_json::Number;
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::{debug, info, instrument};

use super::generators::{
    RandomRoomCodeGenerator, RandomSeedGenerator, RoomCodeGenerator, SeedGenerator,
};
use super::models::{Player, Room};
use super::types::{InputUpdate, JoinOutcome, RoomDeparture, SkillTreeUpdate, WaveAdvance};

/// Process-wide table of live rooms.
///
/// Owns every `Room` and is the only place room state is mutated. Each
/// operation completes its read-modify step under the table lock and
/// returns cloned outcome data; callers emit the resulting acks and
/// broadcasts after the lock is released, so no two operations interleave
/// their mutations of the same room.
pub struct SessionRegistry {
    rooms: Mutex<HashMap<String, Room>>,
    code_generator: Box<dyn RoomCodeGenerator>,
    seed_generator: Box<dyn SeedGenerator>,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionRegistry {
    /// Creates an empty registry with the production random generators
    pub fn new() -> Self {
        Self::with_generators(
            Box::new(RandomRoomCodeGenerator),
            Box::new(RandomSeedGenerator),
        )
    }

    /// Creates an empty registry with injected generators, so tests can
    /// supply deterministic codes and seeds
    pub fn with_generators(
        code_generator: Box<dyn RoomCodeGenerator>,
        seed_generator: Box<dyn SeedGenerator>,
    ) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            code_generator,
            seed_generator,
        }
    }

    /// Creates a room hosted by `host_id` and returns its full state.
    ///
    /// Never fails: code generation is assumed always available and code
    /// collisions are accepted as negligible.
    #[instrument(skip(self))]
    pub fn create_room(&self, host_id: &str, host_name: &str) -> Room {
        let room_id = self.code_generator.generate();
        let seed = self.seed_generator.generate();
        let room = Room::new(
            room_id.clone(),
            seed,
            host_id.to_string(),
            host_name.to_string(),
        );

        let mut rooms = self.rooms.lock().unwrap();
        rooms.insert(room_id.clone(), room.clone());

        info!(
            room_id = %room_id,
            host_id = %host_id,
            player_name = %host_name,
            seed = seed,
            "Room created"
        );

        room
    }

    /// Adds `player_id` to a room.
    ///
    /// On success the returned room state already reflects the insertion,
    /// so the joiner's ack never shows a partial view.
    #[instrument(skip(self))]
    pub fn join_room(&self, room_id: &str, player_id: &str, player_name: &str) -> JoinOutcome {
        let mut rooms = self.rooms.lock().unwrap();

        let room = match rooms.get_mut(room_id) {
            Some(room) => room,
            None => {
                debug!(room_id = %room_id, "Join rejected: room not found");
                return JoinOutcome::RoomNotFound;
            }
        };

        if room.is_full() {
            debug!(
                room_id = %room_id,
                player_count = room.player_count(),
                "Join rejected: room full"
            );
            return JoinOutcome::RoomFull;
        }

        let player = Player::new(player_id.to_string(), player_name.to_string(), false);
        room.players.insert(player_id.to_string(), player.clone());

        info!(
            room_id = %room_id,
            player_id = %player_id,
            player_name = %player_name,
            player_count = room.player_count(),
            "Player joined room"
        );

        JoinOutcome::Joined {
            room: room.clone(),
            player,
        }
    }

    /// Merges client-reported position/health into the caller's entry.
    ///
    /// `hp` is overwritten only when the input carried one. Returns `None`
    /// (no broadcast) when the room is unknown or the caller is not a
    /// member, which is the normal race of input arriving after a leave.
    #[instrument(skip(self))]
    pub fn apply_input(
        &self,
        room_id: &str,
        player_id: &str,
        x: f32,
        y: f32,
        hp: Option<i32>,
    ) -> Option<InputUpdate> {
        let mut rooms = self.rooms.lock().unwrap();

        let room = rooms.get_mut(room_id)?;
        let player = room.players.get_mut(player_id)?;

        player.x = x;
        player.y = y;
        if let Some(hp) = hp {
            player.hp = hp;
        }

        debug!(room_id = %room_id, player_id = %player_id, x, y, "Applied player input");

        Some(InputUpdate {
            recipients: room.member_ids_except(player_id),
            x,
            y,
            hp,
        })
    }

    /// Every connection in the room, for fire-and-forget broadcasts.
    ///
    /// Deliberately does not validate caller membership; an unknown room
    /// simply yields no recipients.
    pub fn room_members(&self, room_id: &str) -> Vec<String> {
        let rooms = self.rooms.lock().unwrap();
        rooms
            .get(room_id)
            .map(|room| room.member_ids())
            .unwrap_or_default()
    }

    /// Advances the wave counter. Host only; anyone else is a silent no-op.
    #[instrument(skip(self))]
    pub fn advance_wave(&self, room_id: &str, caller_id: &str) -> Option<WaveAdvance> {
        let mut rooms = self.rooms.lock().unwrap();

        let room = rooms.get_mut(room_id)?;
        if !room.is_host(caller_id) {
            debug!(room_id = %room_id, caller_id = %caller_id, "Wave advance ignored: not host");
            return None;
        }

        room.wave += 1;

        info!(room_id = %room_id, wave = room.wave, "Wave advanced");

        Some(WaveAdvance {
            wave: room.wave,
            seed: room.seed,
            recipients: room.member_ids(),
        })
    }

    /// Sets one skill level, creating the entry if absent. Host only.
    #[instrument(skip(self))]
    pub fn set_skill(
        &self,
        room_id: &str,
        caller_id: &str,
        skill: &str,
        value: Number,
    ) -> Option<SkillTreeUpdate> {
        let mut rooms = self.rooms.lock().unwrap();

        let room = rooms.get_mut(room_id)?;
        if !room.is_host(caller_id) {
            debug!(room_id = %room_id, caller_id = %caller_id, "Skill choice ignored: not host");
            return None;
        }

        room.skill_tree.insert(skill.to_string(), value);

        info!(room_id = %room_id, skill = %skill, "Skill tree updated");

        Some(SkillTreeUpdate {
            skill_tree: room.skill_tree.clone(),
            recipients: room.member_ids(),
        })
    }

    /// Returns the room's members if `caller_id` is its host, so the
    /// game-starting signal can go out. Anyone else is a silent no-op.
    #[instrument(skip(self))]
    pub fn start_game(&self, room_id: &str, caller_id: &str) -> Option<Vec<String>> {
        let rooms = self.rooms.lock().unwrap();

        let room = rooms.get(room_id)?;
        if !room.is_host(caller_id) {
            debug!(room_id = %room_id, caller_id = %caller_id, "Start game ignored: not host");
            return None;
        }

        Some(room.member_ids())
    }

    /// Removes a terminated connection from every room that contains it.
    ///
    /// A connection belongs to at most one room in practice, but the sweep
    /// covers the whole table. Rooms emptied by the removal are deleted in
    /// the same pass; host departure does not reassign `host_id`, the room
    /// just becomes hostless.
    #[instrument(skip(self))]
    pub fn remove_connection(&self, connection_id: &str) -> Vec<RoomDeparture> {
        let mut rooms = self.rooms.lock().unwrap();
        let mut departures = Vec::new();

        for (room_id, room) in rooms.iter_mut() {
            if let Some(player) = room.players.remove(connection_id) {
                info!(
                    room_id = %room_id,
                    player_id = %connection_id,
                    player_name = %player.name,
                    "Player left room"
                );

                departures.push(RoomDeparture {
                    room_id: room_id.clone(),
                    player_name: player.name,
                    remaining: room.member_ids(),
                    room_deleted: room.players.is_empty(),
                });
            }
        }

        rooms.retain(|room_id, room| {
            if room.players.is_empty() {
                info!(room_id = %room_id, "Room removed (empty)");
                false
            } else {
                true
            }
        });

        departures
    }

    /// Snapshot of a single room, mainly for tests and diagnostics
    pub fn get_room(&self, room_id: &str) -> Option<Room> {
        let rooms = self.rooms.lock().unwrap();
        rooms.get(room_id).cloned()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.lock().unwrap().len()
    }
}
