// Public API - what other modules can use
pub use generators::{
    RandomRoomCodeGenerator, RandomSeedGenerator, RoomCodeGenerator, SeedGenerator,
};
pub use models::{Player, Room, MAX_PLAYERS};
pub use registry::SessionRegistry;
pub use types::{InputUpdate, JoinOutcome, RoomDeparture, SkillTreeUpdate, WaveAdvance};

// Internal modules
pub mod generators;
pub mod models;
mod registry;
pub mod types;
