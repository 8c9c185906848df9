//! Board tuning knobs.
//!
//! # Responsibility
//! - Hold interaction thresholds and placement defaults in one place.
//! - Load from any serde source; every field falls back to its default.
//!
//! # Invariants
//! - `capture_radius` and `click_threshold` are positive and finite.
//! - `spawn_area` is non-empty (`min < max` on both axes).

use crate::model::goal::Position;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default radius around the archive zone centre that captures a drop.
pub const DEFAULT_CAPTURE_RADIUS: f64 = 50.0;
/// Default pointer travel below which a press/release counts as a click.
pub const DEFAULT_CLICK_THRESHOLD: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub capture_radius: f64,
    pub click_threshold: f64,
    /// Screen position of the archive zone centre.
    pub archive_center: Position,
    /// Where new and restored goals land when no position is given.
    pub spawn_area: SpawnArea,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            capture_radius: DEFAULT_CAPTURE_RADIUS,
            click_threshold: DEFAULT_CLICK_THRESHOLD,
            archive_center: Position::new(1180.0, 640.0),
            spawn_area: SpawnArea::default(),
        }
    }
}

impl BoardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.capture_radius.is_finite() && self.capture_radius > 0.0) {
            return Err(ConfigError::InvalidCaptureRadius(self.capture_radius));
        }
        if !(self.click_threshold.is_finite() && self.click_threshold > 0.0) {
            return Err(ConfigError::InvalidClickThreshold(self.click_threshold));
        }
        if !self.archive_center.is_finite() {
            return Err(ConfigError::InvalidArchiveCenter);
        }
        self.spawn_area.validate()
    }
}

/// Axis-aligned, half-open placement rectangle `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnArea {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
}

impl Default for SpawnArea {
    fn default() -> Self {
        Self {
            min_x: 200.0,
            max_x: 600.0,
            min_y: 200.0,
            max_y: 500.0,
        }
    }
}

impl SpawnArea {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [self.min_x, self.max_x, self.min_y, self.max_y]
            .iter()
            .all(|value| value.is_finite());
        if !finite || self.min_x >= self.max_x || self.min_y >= self.max_y {
            return Err(ConfigError::EmptySpawnArea);
        }
        Ok(())
    }

    pub fn contains(&self, position: Position) -> bool {
        (self.min_x..self.max_x).contains(&position.x)
            && (self.min_y..self.max_y).contains(&position.y)
    }

    /// Picks a uniformly random point inside the area.
    ///
    /// # Errors
    /// - `EmptySpawnArea` when the area is inverted, empty or non-finite.
    pub fn random_position(&self) -> Result<Position, ConfigError> {
        self.validate()?;
        let mut rng = rand::thread_rng();
        Ok(Position::new(
            rng.gen_range(self.min_x..self.max_x),
            rng.gen_range(self.min_y..self.max_y),
        ))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    InvalidCaptureRadius(f64),
    InvalidClickThreshold(f64),
    InvalidArchiveCenter,
    EmptySpawnArea,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCaptureRadius(value) => {
                write!(f, "capture_radius must be positive, got {value}")
            }
            Self::InvalidClickThreshold(value) => {
                write!(f, "click_threshold must be positive, got {value}")
            }
            Self::InvalidArchiveCenter => write!(f, "archive_center must be finite"),
            Self::EmptySpawnArea => write!(f, "spawn_area must have min < max on both axes"),
        }
    }
}

impl Error for ConfigError {}
