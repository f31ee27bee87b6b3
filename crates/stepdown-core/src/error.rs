//! Error handling for stepdown
//!
//! Provides the error types for every layer of the tool:
//! - G-Code errors (tokenizing and block parsing)
//! - Configuration errors (pass parameters, alignment, program shape)
//!
//! All error types use `thiserror` for ergonomic error handling. Every error
//! is fatal to a run; nothing here is retried.

use thiserror::Error;

/// G-Code error type
///
/// Represents errors raised while turning one line of program text into a block.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GcodeError {
    /// A character that does not start any known token
    #[error("Unexpected character {ch}")]
    UnexpectedCharacter {
        /// The offending character.
        ch: char,
    },

    /// A block-delete `/` somewhere other than the first column
    #[error("Invalid position for '/'")]
    InvalidSlashPosition,

    /// The numeric argument of a command could not be parsed
    #[error("Invalid value '{text}' for {command}")]
    InvalidValue {
        /// The command letter.
        command: char,
        /// The text that failed to parse.
        text: String,
    },

    /// The command parsed but is not in the supported set
    #[error("Unsupported command: {command}")]
    UnsupportedCommand {
        /// The command as rendered in pretty form, e.g. `G91`.
        command: String,
    },

    /// A word that may appear once per block appeared twice
    #[error("Multiple {word} in block")]
    MultipleInBlock {
        /// `G0/G1`, `X`, `Y` or `Z`.
        word: String,
    },
}

/// Configuration error type
///
/// Raised before any pass is generated when the parameters or the program
/// cannot produce a meaningful result.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Depth increment must be a finite negative number
    #[error("Increment must be negative, got {0}")]
    InvalidIncrement(f64),

    /// Feed override must be positive when set
    #[error("Feed rate override must be > 0, got {0}")]
    InvalidFeedOverride(i32),

    /// A numeric parameter is NaN or infinite
    #[error("Parameter '{name}' must be finite, got {value}")]
    NotFinite {
        /// The parameter name.
        name: String,
        /// The rejected value.
        value: f64,
    },

    /// Alignment mode text is not one of none, corner, center
    #[error("Unknown alignment mode: {0}")]
    UnknownAlignment(String),

    /// The deepest Z in the program is above the surface
    #[error("MinZ > 0 ({min_z}), there is no material to cut")]
    NoMaterial {
        /// The smallest Z found in the program body.
        min_z: f64,
    },

    /// No line in the program carries G0/G1, X, Y or Z
    #[error("Program contains no motion data")]
    NoMotionData,
}

/// Main error type for stepdown
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// G-Code error attached to the input line it came from
    #[error("Failed to parse line {line_number} '{text}': {error}")]
    Line {
        /// 1-based line number in the input.
        line_number: usize,
        /// The trimmed line text.
        text: String,
        /// The underlying parse failure.
        error: GcodeError,
    },

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    /// Attach an input line to a parse error
    pub fn at_line(line_number: usize, text: impl Into<String>, error: GcodeError) -> Self {
        Error::Line {
            line_number,
            text: text.into(),
            error,
        }
    }

    /// Check if this is a G-Code error
    pub fn is_gcode_error(&self) -> bool {
        matches!(self, Error::Line { .. })
    }

    /// Check if this is a configuration error
    pub fn is_config_error(&self) -> bool {
        matches!(self, Error::Config(_))
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gcode_error_display() {
        let err = GcodeError::UnsupportedCommand {
            command: "G91".to_string(),
        };
        assert_eq!(err.to_string(), "Unsupported command: G91");

        let err = GcodeError::MultipleInBlock {
            word: "X".to_string(),
        };
        assert_eq!(err.to_string(), "Multiple X in block");

        let err = GcodeError::UnexpectedCharacter { ch: 'Q' };
        assert_eq!(err.to_string(), "Unexpected character Q");
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::UnknownAlignment("left".to_string());
        assert_eq!(err.to_string(), "Unknown alignment mode: left");

        let err = ConfigError::InvalidFeedOverride(0);
        assert_eq!(err.to_string(), "Feed rate override must be > 0, got 0");
    }

    #[test]
    fn test_line_error_carries_context() {
        let err = Error::at_line(
            7,
            "G0 X1 X2",
            GcodeError::MultipleInBlock {
                word: "X".to_string(),
            },
        );
        assert!(err.is_gcode_error());
        assert_eq!(err.to_string(), "Failed to parse line 7 'G0 X1 X2': Multiple X in block");
    }

    #[test]
    fn test_error_conversion() {
        let err: Error = ConfigError::NoMotionData.into();
        assert!(err.is_config_error());
        assert!(!err.is_gcode_error());
        assert_eq!(err.to_string(), "Program contains no motion data");
    }
}
