use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::state::Position;

/// Width of the playfield in pixels
pub const SCREEN_WIDTH: u32 = 900;
/// Height of the playfield in pixels
pub const SCREEN_HEIGHT: u32 = 600;
/// Edge length of one grid cell in pixels
pub const CELL_SIZE: u32 = 30;

pub const COLUMNS: i32 = (SCREEN_WIDTH / CELL_SIZE) as i32;
pub const ROWS: i32 = (SCREEN_HEIGHT / CELL_SIZE) as i32;

pub const BODY_START: Position = Position { x: 6, y: 9 };
pub const TARGET_START: Position = Position { x: 12, y: 18 };

/// Milliseconds between two game ticks
pub const TICK_INTERVAL_MS: u64 = 100;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the playfield in pixels
    pub screen_width: u32,
    /// Height of the playfield in pixels
    pub screen_height: u32,
    /// Edge length of one cell; the grid is `screen / cell_size` cells
    pub cell_size: u32,
    /// Cell the body starts on
    pub body_start: Position,
    /// Cell the first target is placed on
    pub target_start: Position,
    /// Milliseconds between ticks
    pub tick_interval_ms: u64,
    /// Seed for target placement; random when absent
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            cell_size: CELL_SIZE,
            body_start: BODY_START,
            target_start: TARGET_START,
            tick_interval_ms: TICK_INTERVAL_MS,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Create a configuration with a custom grid size in cells.
    ///
    /// Sizes too large for the screen saturate at `u32::MAX` pixels.
    pub fn with_grid(columns: u32, rows: u32) -> Self {
        Self {
            screen_width: columns.saturating_mul(CELL_SIZE),
            screen_height: rows.saturating_mul(CELL_SIZE),
            ..Default::default()
        }
    }

    /// Resize the screen to hold the given number of cells at the current cell size
    pub fn set_grid(&mut self, columns: Option<u32>, rows: Option<u32>) -> Result<()> {
        let cell_size = match self.cell_size {
            0 => CELL_SIZE,
            size => size,
        };

        if let Some(columns) = columns {
            self.screen_width = columns.checked_mul(cell_size).with_context(|| {
                format!("Grid of {columns} columns does not fit in the screen size")
            })?;
        }
        if let Some(rows) = rows {
            self.screen_height = rows.checked_mul(cell_size).with_context(|| {
                format!("Grid of {rows} rows does not fit in the screen size")
            })?;
        }

        Ok(())
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self {
            body_start: Position::new(2, 2),
            target_start: Position::new(7, 7),
            ..Self::with_grid(10, 10)
        }
    }

    /// Number of grid columns
    pub fn columns(&self) -> i32 {
        match self.cell_size {
            0 => 0,
            size => (self.screen_width / size) as i32,
        }
    }

    /// Number of grid rows
    pub fn rows(&self) -> i32 {
        match self.cell_size {
            0 => 0,
            size => (self.screen_height / size) as i32,
        }
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.columns() && pos.y >= 0 && pos.y < self.rows()
    }

    /// Load a configuration from a JSON file; missing fields take their defaults
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Reject configurations the game cannot start from
    pub fn validate(&self) -> Result<()> {
        ensure!(self.cell_size > 0, "Cell size must be positive");
        ensure!(self.tick_interval_ms > 0, "Tick interval must be positive");

        let cells = i64::from(self.columns()) * i64::from(self.rows());
        if cells < 2 {
            bail!(
                "Grid of {}x{} cells leaves no room for a target",
                self.columns(),
                self.rows()
            );
        }

        ensure!(
            self.contains(self.body_start),
            "Body start {:?} lies outside the {}x{} grid",
            self.body_start,
            self.columns(),
            self.rows()
        );
        ensure!(
            self.contains(self.target_start),
            "Target start {:?} lies outside the {}x{} grid",
            self.target_start,
            self.columns(),
            self.rows()
        );
        ensure!(
            self.body_start != self.target_start,
            "Body and target cannot start on the same cell"
        );

        Ok(())
    }
}
