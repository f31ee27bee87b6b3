//! Depth Pass - multi-pass step-down of a full-depth program
//!
//! The body of a program is replayed once per pass. Every pass but the last
//! limits each depth to what that pass is allowed to cut, leaving
//! `min_cut` of stock for the finishing pass, which replays the body
//! unchanged.
//!
//! Within a clamped pass, lines that add neither Y motion nor useful Z
//! motion are held back and only the last one of a run is emitted. When
//! the held point was last cut in a shallower pass, the tool rapids to skip
//! height over it and is brought back down at a controlled feed.

use std::sync::Arc;

use stepdown_core::{ConfigError, EventDispatcher, PassEvent, PassListener, Result};
use stepdown_parser::{render_blocks, Axis, Block, Token};
use tracing::{debug, info};

use crate::program::{Program, Range};

/// Parameters of the step-down
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassParameters {
    /// Depth added per pass; negative goes into the material
    pub increment: f64,
    /// Stock thickness left above each clamped depth for the finishing pass
    pub min_cut: f64,
    /// Clearance height used for rapid traversal over uncut points
    pub skip_height: f64,
    /// Feed rate written over every F word in the clamped passes
    pub feed_override: Option<i32>,
}

impl Default for PassParameters {
    fn default() -> Self {
        Self {
            increment: -3.0,
            min_cut: 0.5,
            skip_height: 1.0,
            feed_override: None,
        }
    }
}

impl PassParameters {
    /// Reject parameters that cannot produce a valid step-down
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        for (name, value) in [
            ("increment", self.increment),
            ("min_cut", self.min_cut),
            ("skip_height", self.skip_height),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite {
                    name: name.to_string(),
                    value,
                });
            }
        }
        if self.increment >= 0.0 {
            return Err(ConfigError::InvalidIncrement(self.increment));
        }
        if let Some(feed) = self.feed_override.filter(|&feed| feed <= 0) {
            return Err(ConfigError::InvalidFeedOverride(feed));
        }
        Ok(())
    }
}

/// How generated lines are presented
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputStyle {
    /// Space-separated, zero-padded, fixed three-decimal output with
    /// comments on inserted moves
    pub pretty: bool,
    /// Emit a `;skip` comment for every elided line
    pub annotate_skips: bool,
}

/// Clamp a depth to what `pass` may cut
///
/// Returns `None` for depths at or above the surface, which never need
/// staging. Otherwise returns the clamped Z and the deepest pass at which
/// the point is already fully cut.
pub fn clamp_depth(z: f64, increment: f64, min_cut: f64, pass: u32) -> Option<(f64, u32)> {
    if z >= 0.0 {
        return None;
    }
    let last_pass = ((z / increment).ceil() - 1.0).max(0.0) as u32;
    let z_cut = (increment * f64::from(last_pass)).max(increment * f64::from(pass));
    Some((z_cut + min_cut, last_pass))
}

/// Clamp a block's Z in place for `pass`
///
/// No-op for blocks already clamped or without Z.
pub fn clamp_block(block: &mut Block, params: &PassParameters, pass: u32) {
    if block.is_clamped {
        return;
    }
    let Some(z) = block.z() else {
        return;
    };
    match clamp_depth(z, params.increment, params.min_cut, pass) {
        Some((clamped, last_pass)) => {
            block.set_z(clamped);
            block.last_pass = last_pass;
            block.is_clamped = true;
        }
        None => {
            block.last_pass = 0;
            block.is_clamped = false;
        }
    }
}

/// Sentinel for a coordinate not seen yet in this pass
const UNKNOWN: f64 = f64::MAX;

/// Last known tool position during a clamped pass
#[derive(Debug, Clone, Copy)]
struct Position {
    y: f64,
    z: f64,
    last_pass: u32,
}

impl Position {
    fn unknown() -> Self {
        Self {
            y: UNKNOWN,
            z: UNKNOWN,
            last_pass: 0,
        }
    }

    fn update(&mut self, block: &Block) {
        if let Some(y) = block.y() {
            self.y = y;
        }
        if let Some(z) = block.z() {
            self.z = z;
        }
        // last_pass is only meaningful for clamped blocks
        if block.is_clamped {
            self.last_pass = block.last_pass;
        }
    }
}

/// Generator for multi-pass step-down G-code
#[derive(Debug, Clone)]
pub struct DepthPassGenerator {
    params: PassParameters,
    style: OutputStyle,
    events: EventDispatcher,
}

impl DepthPassGenerator {
    /// Create a generator, validating the parameters
    pub fn new(
        params: PassParameters,
        style: OutputStyle,
    ) -> std::result::Result<Self, ConfigError> {
        params.validate()?;
        Ok(Self {
            params,
            style,
            events: EventDispatcher::new(),
        })
    }

    /// Register a listener for pass events
    pub fn with_listener(mut self, listener: Arc<dyn PassListener>) -> Self {
        self.events.subscribe(listener);
        self
    }

    pub fn params(&self) -> &PassParameters {
        &self.params
    }

    pub fn style(&self) -> &OutputStyle {
        &self.style
    }

    /// Number of passes needed to reach the deepest Z
    ///
    /// A body that never goes below zero gets a single, finishing pass.
    pub fn pass_count(&self, z: &Range) -> std::result::Result<u32, ConfigError> {
        if !z.is_valid() || z.min > 0.0 {
            return Err(ConfigError::NoMaterial { min_z: z.min });
        }
        let passes = (z.min / self.params.increment).ceil().max(1.0) as u32;
        Ok(passes)
    }

    /// Generate the full output: setup, every pass, finish
    pub fn generate(&self, program: &Program) -> Result<Vec<Block>> {
        let passes = self.pass_count(&program.extent.z)?;
        info!(
            "MinZ={:.3} MaxZ={:.3} Increment={:.3} MinCut={:.3} SkipHeight={:.3} Passes={}",
            program.extent.z.min,
            program.extent.z.max,
            self.params.increment,
            self.params.min_cut,
            self.params.skip_height,
            passes
        );

        let mut out = program.setup.clone();
        for pass in 1..=passes {
            self.generate_pass(&program.body, pass, passes, &mut out);
        }
        out.extend(program.finish.iter().cloned());
        Ok(out)
    }

    /// Generate and render the full output
    pub fn render_program(&self, program: &Program) -> Result<String> {
        let blocks = self.generate(program)?;
        Ok(render_blocks(&blocks, self.style.pretty))
    }

    /// Append one pass, headed by a `;Pass N` comment
    pub fn generate_pass(&self, body: &[Block], pass: u32, passes: u32, out: &mut Vec<Block>) {
        out.push(comment_block(format!(";Pass {}", pass)));
        let start = out.len();

        if pass == passes {
            self.events.publish(PassEvent::FinishPassStarted { pass });
            out.extend(body.iter().cloned());
        } else {
            self.events.publish(PassEvent::PassStarted { pass, passes });
            self.clamped_pass(body, pass, out);
        }

        self.events.publish(PassEvent::PassCompleted {
            pass,
            lines: out.len() - start,
        });
    }

    fn clamped_pass(&self, body: &[Block], pass: u32, out: &mut Vec<Block>) {
        let mut current = Position::unknown();
        let mut pending: Option<Block> = None;
        let mut safe_height = false;

        for (index, block) in body.iter().enumerate() {
            let last = current;
            let mut clamped = block.clone();
            clamp_block(&mut clamped, &self.params, pass);
            current.update(&clamped);

            if clamped.is_clamped {
                if let Some(z) = clamped.z() {
                    self.events.publish(PassEvent::LineClamped {
                        index,
                        z,
                        last_pass: clamped.last_pass,
                    });
                }
            }

            // Nothing new in Z, or parked at skip height over a point that a
            // later pass recuts anyway. Y motion always has to be emitted.
            let skip = (clamped.no_change(Axis::Z, last.z)
                || (safe_height && current.last_pass < pass))
                && clamped.no_change(Axis::Y, last.y);

            if skip {
                if index + 1 == body.len() {
                    debug!("Output skipped block {} as it is end of data", index);
                    self.emit(out, clamped.clone());
                } else {
                    self.events.publish(PassEvent::LineSkipped {
                        index,
                        last_pass: current.last_pass,
                    });
                    if self.style.annotate_skips {
                        out.push(comment_block(format!(
                            ";skip {}",
                            clamped.render(false, self.style.pretty).trim_end()
                        )));
                    }
                }

                if pending.is_none() && current.last_pass < pass {
                    self.rapid_to_skip_height(out, index, "fast to safe");
                    safe_height = true;
                }

                let mut held = clamped;
                if current.z != UNKNOWN {
                    held.set_z(current.z);
                }
                held.last_pass = current.last_pass;
                held.is_skip = true;
                pending = Some(held);
                continue;
            }

            let mut lifted = false;
            if let Some(mut held) = pending.take() {
                match held.z() {
                    Some(depth) if held.last_pass < pass => {
                        debug!("Output fast held block and slow to depth");
                        held.set_z(self.params.skip_height);
                        held.set_g(0);
                        self.emit(out, held);
                        self.events.publish(PassEvent::PlungeToDepth { index, depth });
                        out.push(self.synthesized_move(1, depth, "slow to depth"));
                        safe_height = false;
                        lifted = true;
                    }
                    _ => self.emit(out, held),
                }
            }

            self.emit(out, clamped);
            if lifted && current.last_pass < pass {
                self.rapid_to_skip_height(out, index, "fast to safe after change");
                safe_height = true;
            }
        }
    }

    /// Push a body block, applying the feed override
    fn emit(&self, out: &mut Vec<Block>, mut block: Block) {
        if let Some(feed) = self.params.feed_override {
            block.set_feed(feed);
        }
        out.push(block);
    }

    fn rapid_to_skip_height(&self, out: &mut Vec<Block>, index: usize, note: &str) {
        self.events.publish(PassEvent::RapidToSkipHeight {
            index,
            height: self.params.skip_height,
        });
        out.push(self.synthesized_move(0, self.params.skip_height, note));
    }

    /// `G0/G1 Z<z>`, annotated in pretty mode
    fn synthesized_move(&self, g: i32, z: f64, note: &str) -> Block {
        let mut block = Block::new();
        block.push(Token::address('G', g));
        block.push(Token::float('Z', z));
        if self.style.pretty {
            block.push(Token::comment(format!(";{}", note)));
        }
        block
    }
}

fn comment_block(text: String) -> Block {
    let mut block = Block::new();
    block.push(Token::Comment(text));
    block
}
