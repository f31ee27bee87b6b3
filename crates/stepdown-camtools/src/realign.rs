//! Realignment of the program body in the XY plane

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use stepdown_core::ConfigError;
use stepdown_parser::Axis;
use tracing::info;

use crate::program::{Extent, Program};

/// Where to move the body's bounding box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Leave coordinates alone
    #[default]
    None,
    /// Move the lower-left corner to the origin
    Corner,
    /// Centre the bounding box on the origin
    Center,
}

impl fmt::Display for Alignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Corner => write!(f, "corner"),
            Self::Center => write!(f, "center"),
        }
    }
}

impl FromStr for Alignment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(Self::None),
            "corner" => Ok(Self::Corner),
            "center" => Ok(Self::Center),
            _ => Err(ConfigError::UnknownAlignment(s.to_string())),
        }
    }
}

/// Offset that moves the extent to the requested alignment
///
/// An axis without any coordinate in the body gets a zero offset.
pub fn alignment_offset(alignment: Alignment, extent: &Extent) -> (f64, f64) {
    let shift = |axis: Axis| {
        let range = extent.range(axis);
        if !range.is_valid() {
            return 0.0;
        }
        match alignment {
            Alignment::None => 0.0,
            Alignment::Corner => -range.min,
            Alignment::Center => -range.center(),
        }
    };
    (shift(Axis::X), shift(Axis::Y))
}

/// Shift every X and Y word of the body and the recorded extent
///
/// Setup and finish carry no coordinates and are left untouched. Returns the
/// applied offset.
pub fn realign(program: &mut Program, alignment: Alignment) -> (f64, f64) {
    let (dx, dy) = alignment_offset(alignment, &program.extent);
    if dx == 0.0 && dy == 0.0 {
        return (dx, dy);
    }
    info!("Realign {}: offset X={:.3} Y={:.3}", alignment, dx, dy);

    for block in &mut program.body {
        if let Some(x) = block.x() {
            block.set_x(x + dx);
        }
        if let Some(y) = block.y() {
            block.set_y(y + dy);
        }
    }
    program.extent.x.offset(dx);
    program.extent.y.offset(dy);
    (dx, dy)
}
