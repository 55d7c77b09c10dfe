//! Configuration for the checkers engine.

use crate::error::ParseDifficultyError;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    // Evaluation constants
    pub advance_weight: i32,
    pub home_zone_bonus: i32,

    // Search constants
    pub search_depth: i32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            advance_weight: 10,
            home_zone_bonus: 50,
            search_depth: 3,
        }
    }
}

/// AI strength tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    /// Uniform random move.
    #[default]
    Easy,
    /// Greedy advance towards the target row.
    Medium,
    /// Alpha-beta minimax.
    Hard,
}

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "medium" => Ok(Difficulty::Medium),
            "hard" => Ok(Difficulty::Hard),
            _ => Err(ParseDifficultyError(s.to_string())),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(name)
    }
}
