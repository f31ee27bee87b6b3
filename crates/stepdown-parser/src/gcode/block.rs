//! G-Code block (one program line) with cached motion fields

use std::fmt;
use stepdown_core::GcodeError;

use super::scanner::tokenize_line;
use super::token::Token;

/// Positioning axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// Command letter for this axis
    pub fn letter(self) -> char {
        match self {
            Axis::X => 'X',
            Axis::Y => 'Y',
            Axis::Z => 'Z',
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// One parsed line of G-code
///
/// Owns its tokens in input order. The X, Y, Z and G0/G1 words are cached as
/// indices into `tokens`, so a cloned block never refers to another block's
/// storage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    tokens: Vec<Token>,
    has_motion: bool,
    x: Option<usize>,
    y: Option<usize>,
    z: Option<usize>,
    g: Option<usize>,
    /// Z has already been limited to the depth of the current pass
    pub is_clamped: bool,
    /// Block is held back by the skip optimisation
    pub is_skip: bool,
    /// Deepest pass at which this block's depth is already fully cut
    pub last_pass: u32,
}

impl Block {
    /// Create an empty block
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a block from tokens and index its fields
    ///
    /// In strict mode a second G0/G1, X, Y or Z is an error.
    pub fn from_tokens(tokens: Vec<Token>, strict: bool) -> Result<Self, GcodeError> {
        let mut block = Self {
            tokens,
            ..Self::default()
        };
        block.parse(strict)?;
        Ok(block)
    }

    /// Scan the tokens and cache the motion fields
    ///
    /// Non-strict mode tolerates duplicates; the last occurrence wins.
    pub fn parse(&mut self, strict: bool) -> Result<(), GcodeError> {
        match self.index_fields() {
            Some(word) if strict => Err(GcodeError::MultipleInBlock {
                word: word.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Re-index fields, returning the first duplicated word if any
    fn index_fields(&mut self) -> Option<&'static str> {
        self.has_motion = false;
        self.x = None;
        self.y = None;
        self.z = None;
        self.g = None;

        let mut duplicate = None;
        for (i, token) in self.tokens.iter().enumerate() {
            let (slot, word) = match token {
                t if t.is_motion_mode() => (&mut self.g, "G0/G1"),
                Token::Float { letter: 'X', .. } => (&mut self.x, "X"),
                Token::Float { letter: 'Y', .. } => (&mut self.y, "Y"),
                Token::Float { letter: 'Z', .. } => (&mut self.z, "Z"),
                _ => continue,
            };
            self.has_motion = true;
            if slot.is_some() && duplicate.is_none() {
                duplicate = Some(word);
            }
            *slot = Some(i);
        }
        duplicate
    }

    /// Tokens in input order
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Check whether the block carries G0/G1, X, Y or Z
    pub fn has_motion(&self) -> bool {
        self.has_motion
    }

    fn slot(&self, axis: Axis) -> Option<usize> {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Value of an axis word, if present
    pub fn axis(&self, axis: Axis) -> Option<f64> {
        self.slot(axis)
            .and_then(|i| self.tokens.get(i))
            .and_then(Token::value)
    }

    /// X value, if present
    pub fn x(&self) -> Option<f64> {
        self.axis(Axis::X)
    }

    /// Y value, if present
    pub fn y(&self) -> Option<f64> {
        self.axis(Axis::Y)
    }

    /// Z value, if present
    pub fn z(&self) -> Option<f64> {
        self.axis(Axis::Z)
    }

    /// Motion mode (0 or 1), if present
    pub fn g(&self) -> Option<i32> {
        match self.g.and_then(|i| self.tokens.get(i)) {
            Some(Token::Address { value, .. }) => Some(*value),
            _ => None,
        }
    }

    /// Feed rate, if present
    pub fn feed(&self) -> Option<i32> {
        self.tokens.iter().find_map(|t| match t {
            Token::Integer { letter: 'F', value } => Some(*value),
            _ => None,
        })
    }

    /// True if the block has no word for `axis` or its value equals `value`
    pub fn no_change(&self, axis: Axis, value: f64) -> bool {
        self.axis(axis).map_or(true, |v| v == value)
    }

    /// Set an axis value, appending the word if missing
    pub fn set_axis(&mut self, axis: Axis, value: f64) {
        if let Some(Token::Float { value: current, .. }) =
            self.slot(axis).and_then(|i| self.tokens.get_mut(i))
        {
            *current = value;
            return;
        }
        self.tokens.push(Token::float(axis.letter(), value));
        self.index_fields();
    }

    /// Set X
    pub fn set_x(&mut self, value: f64) {
        self.set_axis(Axis::X, value);
    }

    /// Set Y
    pub fn set_y(&mut self, value: f64) {
        self.set_axis(Axis::Y, value);
    }

    /// Set Z
    pub fn set_z(&mut self, value: f64) {
        self.set_axis(Axis::Z, value);
    }

    /// Set the motion mode, inserting it first in the block if missing
    pub fn set_g(&mut self, value: i32) {
        if let Some(Token::Address { value: current, .. }) =
            self.g.and_then(|i| self.tokens.get_mut(i))
        {
            *current = value;
            return;
        }
        self.tokens.insert(0, Token::address('G', value));
        self.index_fields();
    }

    /// Overwrite every F word; returns false if the block has none
    pub fn set_feed(&mut self, value: i32) -> bool {
        let mut changed = false;
        for token in &mut self.tokens {
            if let Token::Integer { letter: 'F', value: feed } = token {
                *feed = value;
                changed = true;
            }
        }
        changed
    }

    /// Append a token, re-indexing fields leniently
    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
        self.index_fields();
    }

    /// Render the block
    ///
    /// Pretty mode follows each token with a space, except for `;` and `/`
    /// comments, which run to the end of the line.
    pub fn render(&self, newline: bool, pretty: bool) -> String {
        let mut out = String::new();
        for token in &self.tokens {
            out.push_str(&token.render(pretty));
            if pretty && !token.ends_line() {
                out.push(' ');
            }
        }
        if newline {
            out.push('\n');
        }
        out
    }
}

/// Tokenize one trimmed line and parse it strictly
pub fn parse_line(line: &str) -> Result<Block, GcodeError> {
    if line.is_empty() {
        return Ok(Block::new());
    }
    Block::from_tokens(tokenize_line(line)?, true)
}

/// Render blocks one per line
pub fn render_blocks<'a>(blocks: impl IntoIterator<Item = &'a Block>, pretty: bool) -> String {
    blocks
        .into_iter()
        .map(|block| block.render(true, pretty))
        .collect()
}
