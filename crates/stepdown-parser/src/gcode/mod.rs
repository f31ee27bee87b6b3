//! G-Code tokenizing and block handling

pub mod block;
pub mod scanner;
pub mod token;

pub use block::{parse_line, render_blocks, Axis, Block};
pub use scanner::{tokenize_line, RuneScanner};
pub use token::{Token, TokenKind};
