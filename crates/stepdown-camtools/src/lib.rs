//! # Stepdown CAM Tools
//!
//! Turns a single full-depth cutting program into a sequence of shallower
//! passes.
//!
//! ## Tools Included
//!
//! - **Program**: splits a file into setup, body and finish, and tracks the
//!   coordinate extent of the body
//! - **Realign**: shifts the body so its bounding box sits on a corner or the
//!   centre of the origin
//! - **Depth Pass**: clamps every depth to the current pass, elides redundant
//!   moves and lifts to skip height over uncut regions

pub mod depth_pass;
pub mod program;
pub mod realign;

pub use depth_pass::{clamp_block, clamp_depth, DepthPassGenerator, OutputStyle, PassParameters};
pub use program::{Extent, Program, Range};
pub use realign::{alignment_offset, realign, Alignment};
