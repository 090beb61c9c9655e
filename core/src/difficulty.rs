use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::*;

/// Preset board tiers offered by the difficulty selector.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Normal,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Self; 4] = [Self::Easy, Self::Normal, Self::Hard, Self::Expert];

    pub const fn config(self) -> GameConfig {
        use Difficulty::*;
        match self {
            Easy => GameConfig::new_unchecked((4, 4, 4), 4),
            Normal => GameConfig::new_unchecked((5, 6, 7), 12),
            Hard => GameConfig::new_unchecked((8, 8, 8), 30),
            Expert => GameConfig::new_unchecked((10, 10, 10), 50),
        }
    }

    pub const fn label(self) -> &'static str {
        use Difficulty::*;
        match self {
            Easy => "Easy",
            Normal => "Normal",
            Hard => "Hard",
            Expert => "Expert",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Easy
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Difficulty {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|difficulty| difficulty.label().eq_ignore_ascii_case(s))
            .ok_or(GameError::UnknownDifficulty)
    }
}
