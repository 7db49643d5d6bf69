use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;
use serde::Serialize;

pub const CONFETTI_PIECES: usize = 50;
pub const CONFETTI_LIFETIME: Duration = Duration::from_millis(3_000);
pub const CONFETTI_PALETTE: [&str; 4] = ["#4a7c59", "#28a745", "#ffc107", "#17a2b8"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BurstId(pub u64);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfettiPiece {
    pub color: &'static str,
    /// Horizontal start position, as a percentage of the viewport width.
    pub left_percent: f32,
}

/// A celebratory particle burst. Purely cosmetic; it expires on its own.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfettiBurst {
    pub id: BurstId,
    pub pieces: Vec<ConfettiPiece>,
    #[serde(skip)]
    pub lifetime: Duration,
}

impl ConfettiBurst {
    pub fn generate(id: BurstId, rng: &mut StdRng) -> Self {
        let pieces = (0..CONFETTI_PIECES)
            .map(|_| ConfettiPiece {
                color: CONFETTI_PALETTE[rng.random_range(0..CONFETTI_PALETTE.len())],
                left_percent: rng.random_range(0.0..100.0),
            })
            .collect();

        Self {
            id,
            pieces,
            lifetime: CONFETTI_LIFETIME,
        }
    }
}
