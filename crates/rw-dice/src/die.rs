//! Polyhedral die types supported by the roll provider.

use serde::{Deserialize, Serialize};

use crate::error::{DiceError, DiceResult};

/// A polyhedral die. The roll provider only offers this fixed set, so
/// unlike a generic dice library there is no custom-sided variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Die {
    /// Four-sided die.
    D4,
    /// Six-sided die.
    D6,
    /// Eight-sided die.
    D8,
    /// Ten-sided die.
    D10,
    /// Twelve-sided die.
    D12,
    /// Twenty-sided die.
    D20,
    /// Percentile die (1-100).
    D100,
}

/// All die sizes the roll provider supports.
pub const DIE_SIZES: [u32; 7] = [4, 6, 8, 10, 12, 20, 100];

impl Die {
    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        match self {
            Self::D4 => 4,
            Self::D6 => 6,
            Self::D8 => 8,
            Self::D10 => 10,
            Self::D12 => 12,
            Self::D20 => 20,
            Self::D100 => 100,
        }
    }

    /// Look up a die by its side count. Fails with [`DiceError::UnsupportedDieType`]
    /// for anything outside the provider's fixed set.
    pub fn from_sides(sides: u32) -> DiceResult<Self> {
        match sides {
            4 => Ok(Self::D4),
            6 => Ok(Self::D6),
            8 => Ok(Self::D8),
            10 => Ok(Self::D10),
            12 => Ok(Self::D12),
            20 => Ok(Self::D20),
            100 => Ok(Self::D100),
            other => Err(DiceError::UnsupportedDieType(other)),
        }
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn die_sides() {
        assert_eq!(Die::D4.sides(), 4);
        assert_eq!(Die::D6.sides(), 6);
        assert_eq!(Die::D8.sides(), 8);
        assert_eq!(Die::D10.sides(), 10);
        assert_eq!(Die::D12.sides(), 12);
        assert_eq!(Die::D20.sides(), 20);
        assert_eq!(Die::D100.sides(), 100);
    }

    #[test]
    fn from_sides_round_trips() {
        for sides in DIE_SIZES {
            assert_eq!(Die::from_sides(sides).unwrap().sides(), sides);
        }
    }

    #[test]
    fn from_sides_rejects_unsupported() {
        assert_eq!(Die::from_sides(3), Err(DiceError::UnsupportedDieType(3)));
        assert_eq!(Die::from_sides(7), Err(DiceError::UnsupportedDieType(7)));
        assert_eq!(Die::from_sides(0), Err(DiceError::UnsupportedDieType(0)));
    }

    #[test]
    fn die_display() {
        assert_eq!(Die::D20.to_string(), "d20");
        assert_eq!(Die::D100.to_string(), "d100");
    }

    #[test]
    fn ordering_follows_sides() {
        assert!(Die::D4 < Die::D6);
        assert!(Die::D20 < Die::D100);
    }
}
