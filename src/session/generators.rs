use rand::Rng;

/// Trait for generating room codes
pub trait RoomCodeGenerator: Send + Sync {
    fn generate(&self) -> String;
}

/// Trait for generating the per-room procedural content seed
pub trait SeedGenerator: Send + Sync {
    fn generate(&self) -> u64;
}

const ROOM_CODE_LEN: usize = 6;
const ROOM_CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Random short uppercase alphanumeric room codes.
///
/// Uniqueness across live rooms is probabilistic; with 36^6 codes and a
/// handful of simultaneous rooms there is no collision-retry logic.
pub struct RandomRoomCodeGenerator;

impl RoomCodeGenerator for RandomRoomCodeGenerator {
    fn generate(&self) -> String {
        let mut rng = rand::rng();
        (0..ROOM_CODE_LEN)
            .map(|_| ROOM_CODE_ALPHABET[rng.random_range(0..ROOM_CODE_ALPHABET.len())] as char)
            .collect()
    }
}

/// Random seeds in the range all clients' content generators expect.
pub struct RandomSeedGenerator;

impl SeedGenerator for RandomSeedGenerator {
    fn generate(&self) -> u64 {
        rand::rng().random_range(0..1_000_000_000)
    }
}
