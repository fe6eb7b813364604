//! Generation parameters and their validation.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::*;

#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Output area must be positive, got {width}x{height}")]
    InvalidArea { width: i32, height: i32 },

    #[error("max_leaf_size ({max}) must be at least min_leaf_size ({min})")]
    LeafSizeOrder { min: i32, max: i32 },

    #[error("min_leaf_size must be positive, got {0}")]
    InvalidLeafSize(i32),

    #[error("{name} must be within [0, 1], got {value}")]
    InvalidChance { name: &'static str, value: f64 },
}

/// Parameters for one dungeon generation run.
///
/// Probabilities are checked by [`DungeonConfig::validate`] because
/// `Rng::gen_bool` panics outside `[0, 1]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DungeonConfig {
    /// Output area width in cells
    pub width: i32,
    /// Output area height in cells
    pub height: i32,
    /// Smallest dimension a child region may have after a split
    pub min_leaf_size: i32,
    /// Regions with a dimension above this always keep splitting
    pub max_leaf_size: i32,
    /// Chance that a non-forced region attempts a split each pass
    pub split_chance: f64,
    /// Chance used for orientation, room-pick, and bend tie-breaks
    pub tiebreak_chance: f64,
}

impl DungeonConfig {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            min_leaf_size: DEFAULT_MIN_LEAF_SIZE,
            max_leaf_size: DEFAULT_MAX_LEAF_SIZE,
            split_chance: DEFAULT_SPLIT_CHANCE,
            tiebreak_chance: DEFAULT_TIEBREAK_CHANCE,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(ConfigError::InvalidArea {
                width: self.width,
                height: self.height,
            });
        }
        if self.min_leaf_size <= 0 {
            return Err(ConfigError::InvalidLeafSize(self.min_leaf_size));
        }
        if self.max_leaf_size < self.min_leaf_size {
            return Err(ConfigError::LeafSizeOrder {
                min: self.min_leaf_size,
                max: self.max_leaf_size,
            });
        }
        for (name, value) in [
            ("split_chance", self.split_chance),
            ("tiebreak_chance", self.tiebreak_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidChance { name, value });
            }
        }
        Ok(())
    }
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DUNGEON_WIDTH, DEFAULT_DUNGEON_HEIGHT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(DungeonConfig::default().validate(), Ok(()));
    }

    #[rstest]
    #[case(0, 30)]
    #[case(40, 0)]
    #[case(-5, 30)]
    fn test_rejects_non_positive_area(#[case] width: i32, #[case] height: i32) {
        let config = DungeonConfig::new(width, height);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidArea { width, height })
        );
    }

    #[test]
    fn test_rejects_max_leaf_below_min() {
        let config = DungeonConfig {
            min_leaf_size: 10,
            max_leaf_size: 8,
            ..DungeonConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::LeafSizeOrder { min: 10, max: 8 })
        );
    }

    #[rstest]
    #[case(-0.1)]
    #[case(1.5)]
    fn test_rejects_out_of_range_chance(#[case] chance: f64) {
        let config = DungeonConfig {
            split_chance: chance,
            ..DungeonConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidChance { name: "split_chance", .. })
        ));
    }

    #[test]
    fn test_error_message_names_values() {
        let err = DungeonConfig::new(0, 30).validate().unwrap_err();
        assert_eq!(err.to_string(), "Output area must be positive, got 0x30");
    }
}
