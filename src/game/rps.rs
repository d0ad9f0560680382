use rand::seq::IndexedRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// Score awarded for winning a rock-paper-scissors round
pub const RPS_WIN_SCORE: i32 = 10;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RpsChoice {
    Rock,
    Paper,
    Scissors,
}

impl RpsChoice {
    pub const ALL: [RpsChoice; 3] = [RpsChoice::Rock, RpsChoice::Paper, RpsChoice::Scissors];

    /// The choice this one defeats under the cyclic dominance rule
    pub fn beats(self) -> RpsChoice {
        match self {
            RpsChoice::Rock => RpsChoice::Scissors,
            RpsChoice::Paper => RpsChoice::Rock,
            RpsChoice::Scissors => RpsChoice::Paper,
        }
    }

    /// Uniform random choice for the computer opponent
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).expect("choice list is non-empty")
    }
}

/// Round result from the player's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RpsOutcome {
    Win,
    Lose,
    Tie,
}

pub fn evaluate_choice(player: RpsChoice, computer: RpsChoice) -> RpsOutcome {
    if player == computer {
        RpsOutcome::Tie
    } else if player.beats() == computer {
        RpsOutcome::Win
    } else {
        RpsOutcome::Lose
    }
}
