//! Command-line interface

use clap::Parser;
use std::path::PathBuf;
use stepdown_camtools::Alignment;
use stepdown_settings::Config;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (built ",
    env!("BUILD_DATE"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "stepdown")]
#[command(about = "Split a full-depth G-code cut into shallower passes", long_about = None)]
#[command(version, long_version = LONG_VERSION)]
pub struct Cli {
    /// G-code program to process
    pub infile: PathBuf,

    /// Output file; stdout when omitted
    pub outfile: Option<PathBuf>,

    /// Depth of cut per pass (negative)
    #[arg(short, long, allow_negative_numbers = true)]
    pub increment: Option<f64>,

    /// Thickness left for the finishing pass
    #[arg(short, long, allow_negative_numbers = true)]
    pub min_cut: Option<f64>,

    /// Clearance height for rapid traversal
    #[arg(short, long, allow_negative_numbers = true)]
    pub skip_height: Option<f64>,

    /// Feed rate override for the incremental passes
    #[arg(short, long)]
    pub feed: Option<i32>,

    /// Move the body to none, corner or center
    #[arg(short, long)]
    pub align: Option<Alignment>,

    /// Pretty-print output
    #[arg(short, long)]
    pub pretty: bool,

    /// Settings file (.toml or .json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Debug logging plus ";skip" annotations
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Overlay the flags given on the command line onto loaded settings
    pub fn apply(&self, config: &mut Config) {
        if let Some(increment) = self.increment {
            config.passes.increment = increment;
        }
        if let Some(min_cut) = self.min_cut {
            config.passes.min_cut = min_cut;
        }
        if let Some(skip_height) = self.skip_height {
            config.passes.skip_height = skip_height;
        }
        if self.feed.is_some() {
            config.passes.feed_override = self.feed;
        }
        if let Some(alignment) = self.align {
            config.output.alignment = alignment;
        }
        if self.pretty {
            config.output.pretty = true;
        }
        if self.debug {
            config.output.annotate_skips = true;
        }
    }
}
