//! # Stepdown Parser
//!
//! Turns one line of G-code into a [`Block`]: an order-preserving list of
//! [`Token`]s plus cached positions of the X, Y, Z and motion-mode words.
//!
//! Only the small command subset needed for flat 2.5D cutting programs is
//! accepted; everything else is rejected with a
//! [`GcodeError`](stepdown_core::GcodeError).

pub mod gcode;

pub use gcode::{
    parse_line, render_blocks, tokenize_line, Axis, Block, RuneScanner, Token, TokenKind,
};
