//! Program layout and coordinate extent
//!
//! A program is split into three contiguous parts:
//! - **Setup**: every line before the first motion line
//! - **Body**: first motion line through last motion line, inclusive
//! - **Finish**: every line after the last motion line

use stepdown_core::{ConfigError, Error, Result};
use stepdown_parser::{parse_line, Axis, Block};
use tracing::debug;

/// Min/max of one axis
///
/// Starts empty at (+inf, -inf) and only ever widens.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Default for Range {
    fn default() -> Self {
        Self::new()
    }
}

impl Range {
    pub fn new() -> Self {
        Self {
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn update(&mut self, value: f64) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// True once at least one value has been seen
    pub fn is_valid(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Shift both ends; an empty range stays empty
    pub fn offset(&mut self, delta: f64) {
        if self.is_valid() {
            self.min += delta;
            self.max += delta;
        }
    }

    pub fn center(&self) -> f64 {
        (self.max + self.min) / 2.0
    }
}

/// Per-axis extent of the program body
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Extent {
    pub x: Range,
    pub y: Range,
    pub z: Range,
}

impl Extent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Widen the extent by every coordinate word in `block`
    pub fn include(&mut self, block: &Block) {
        if let Some(x) = block.axis(Axis::X) {
            self.x.update(x);
        }
        if let Some(y) = block.axis(Axis::Y) {
            self.y.update(y);
        }
        if let Some(z) = block.axis(Axis::Z) {
            self.z.update(z);
        }
    }

    pub fn range(&self, axis: Axis) -> &Range {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }
}

/// A parsed program split into setup, body and finish
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub setup: Vec<Block>,
    pub body: Vec<Block>,
    pub finish: Vec<Block>,
    pub extent: Extent,
}

impl Program {
    /// Split blocks around the first and last motion line
    ///
    /// A program without any motion line cannot be stepped and is rejected.
    pub fn from_blocks(mut blocks: Vec<Block>) -> std::result::Result<Self, ConfigError> {
        let first = blocks.iter().position(Block::has_motion);
        let last = blocks.iter().rposition(Block::has_motion);
        let (first, last) = match (first, last) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(ConfigError::NoMotionData),
        };
        debug!("first={} last={}", first, last);

        let finish = blocks.split_off(last + 1);
        let body = blocks.split_off(first);
        let setup = blocks;

        let mut extent = Extent::new();
        for block in &body {
            extent.include(block);
        }

        Ok(Self {
            setup,
            body,
            finish,
            extent,
        })
    }

    /// Parse a whole program text
    ///
    /// Lines are trimmed and blank lines ignored. Errors carry the 1-based
    /// line number of the offending input line.
    pub fn from_text(text: &str) -> Result<Self> {
        let mut blocks = Vec::new();
        for (i, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let block = parse_line(line).map_err(|e| Error::at_line(i + 1, line, e))?;
            blocks.push(block);
        }
        debug!("loaded {} blocks", blocks.len());
        Ok(Self::from_blocks(blocks)?)
    }

    /// All lines in original order
    pub fn lines(&self) -> impl Iterator<Item = &Block> {
        self.setup
            .iter()
            .chain(self.body.iter())
            .chain(self.finish.iter())
    }

    /// Total number of lines
    pub fn len(&self) -> usize {
        self.setup.len() + self.body.len() + self.finish.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
