//! G-Code token types and rendering

/// Token kind
///
/// The kind decides which values a token can hold and how it is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Integer machine-state selector (G, M)
    Address,
    /// Integer value (F, S)
    Integer,
    /// Coordinate (X, Y, Z)
    Float,
    /// `;`, `/` or `(...)` comment
    Comment,
    /// `%` program delimiter
    ProgramDelimiter,
}

/// One word of a G-code line
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// G or M word; rendered zero padded to two digits in pretty mode
    Address { letter: char, value: i32 },
    /// F or S word
    Integer { letter: char, value: i32 },
    /// X, Y or Z word; rendered with three decimals
    Float { letter: char, value: f64 },
    /// Comment text including its delimiters, e.g. `;done` or `(tool 1)`
    Comment(String),
    /// `%`
    ProgramDelimiter,
}

/// Supported G values
const SUPPORTED_G: [i32; 5] = [0, 1, 20, 21, 90];
/// Supported M values
const SUPPORTED_M: [i32; 3] = [3, 5, 30];

impl Token {
    /// Create an address (G/M) token
    pub fn address(letter: char, value: i32) -> Self {
        Token::Address { letter, value }
    }

    /// Create an integer (F/S) token
    pub fn integer(letter: char, value: i32) -> Self {
        Token::Integer { letter, value }
    }

    /// Create a coordinate token
    pub fn float(letter: char, value: f64) -> Self {
        Token::Float { letter, value }
    }

    /// Create a comment token
    pub fn comment(text: impl Into<String>) -> Self {
        Token::Comment(text.into())
    }

    /// Get the token kind
    pub fn kind(&self) -> TokenKind {
        match self {
            Token::Address { .. } => TokenKind::Address,
            Token::Integer { .. } => TokenKind::Integer,
            Token::Float { .. } => TokenKind::Float,
            Token::Comment(_) => TokenKind::Comment,
            Token::ProgramDelimiter => TokenKind::ProgramDelimiter,
        }
    }

    /// Command letter, `None` for comments and `%`
    pub fn letter(&self) -> Option<char> {
        match self {
            Token::Address { letter, .. }
            | Token::Integer { letter, .. }
            | Token::Float { letter, .. } => Some(*letter),
            Token::Comment(_) | Token::ProgramDelimiter => None,
        }
    }

    /// Numeric value as f64, `None` for comments and `%`
    pub fn value(&self) -> Option<f64> {
        match self {
            Token::Address { value, .. } | Token::Integer { value, .. } => Some(f64::from(*value)),
            Token::Float { value, .. } => Some(*value),
            Token::Comment(_) | Token::ProgramDelimiter => None,
        }
    }

    /// Check whether the command is in the supported set
    pub fn is_supported(&self) -> bool {
        match self {
            Token::Comment(_) | Token::ProgramDelimiter => true,
            Token::Integer { letter, .. } => matches!(letter, 'F' | 'S'),
            Token::Float { letter, .. } => matches!(letter, 'X' | 'Y' | 'Z'),
            Token::Address { letter: 'G', value } => SUPPORTED_G.contains(value),
            Token::Address { letter: 'M', value } => SUPPORTED_M.contains(value),
            Token::Address { .. } => false,
        }
    }

    /// Check for a G0 or G1 word
    pub fn is_motion_mode(&self) -> bool {
        matches!(self, Token::Address { letter: 'G', value: 0 | 1 })
    }

    /// Check for a `;` or `/` comment, which takes the rest of the line
    pub fn ends_line(&self) -> bool {
        matches!(self, Token::Comment(text) if text.starts_with(';') || text.starts_with('/'))
    }

    /// Render the token
    ///
    /// Pretty mode zero pads addresses and keeps three decimals on
    /// coordinates. Compact mode drops trailing zeros and a trailing point.
    pub fn render(&self, pretty: bool) -> String {
        match self {
            Token::Address { letter, value } => {
                if pretty {
                    format!("{}{:02}", letter, value)
                } else {
                    format!("{}{}", letter, value)
                }
            }
            Token::Integer { letter, value } => format!("{}{}", letter, value),
            Token::Float { letter, value } => {
                let fixed = format!("{:.3}", value);
                if pretty {
                    format!("{}{}", letter, fixed)
                } else {
                    format!(
                        "{}{}",
                        letter,
                        fixed.trim_end_matches('0').trim_end_matches('.')
                    )
                }
            }
            Token::Comment(text) => text.clone(),
            Token::ProgramDelimiter => "%".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_compact() {
        assert_eq!(Token::ProgramDelimiter.render(false), "%");
        assert_eq!(Token::integer('F', 250).render(false), "F250");
        assert_eq!(Token::address('G', 1).render(false), "G1");
        assert_eq!(Token::float('X', -1.1).render(false), "X-1.1");
        assert_eq!(Token::float('X', -1.0).render(false), "X-1");
        assert_eq!(Token::float('Z', 10.0).render(false), "Z10");
        assert_eq!(Token::float('Y', 0.0).render(false), "Y0");
        assert_eq!(Token::comment("/bla").render(false), "/bla");
    }

    #[test]
    fn test_render_pretty() {
        assert_eq!(Token::ProgramDelimiter.render(true), "%");
        assert_eq!(Token::integer('F', 250).render(true), "F250");
        assert_eq!(Token::address('G', 1).render(true), "G01");
        assert_eq!(Token::address('G', 90).render(true), "G90");
        assert_eq!(Token::float('X', -1.1).render(true), "X-1.100");
        assert_eq!(Token::float('X', -1.0).render(true), "X-1.000");
        assert_eq!(Token::comment("/bla").render(true), "/bla");
    }

    #[test]
    fn test_supported_whitelist() {
        for g in [0, 1, 20, 21, 90] {
            assert!(Token::address('G', g).is_supported(), "G{} should pass", g);
        }
        for m in [3, 5, 30] {
            assert!(Token::address('M', m).is_supported(), "M{} should pass", m);
        }
        assert!(!Token::address('G', 91).is_supported());
        assert!(!Token::address('G', 2).is_supported());
        assert!(!Token::address('M', 8).is_supported());
        assert!(Token::comment("(x)").is_supported());
        assert!(Token::ProgramDelimiter.is_supported());
    }

    #[test]
    fn test_kind_and_accessors() {
        let t = Token::float('Z', -2.5);
        assert_eq!(t.kind(), TokenKind::Float);
        assert_eq!(t.letter(), Some('Z'));
        assert_eq!(t.value(), Some(-2.5));
        assert!(!t.is_motion_mode());

        assert!(Token::address('G', 0).is_motion_mode());
        assert!(!Token::address('G', 21).is_motion_mode());
        assert_eq!(Token::comment(";x").letter(), None);
        assert_eq!(Token::ProgramDelimiter.kind(), TokenKind::ProgramDelimiter);
    }
}
