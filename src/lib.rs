//! # Stepdown
//!
//! Splits a single full-depth G-code cutting program into several shallower
//! passes, each limited in depth, with a final pass at full depth.
//!
//! ## Architecture
//!
//! Stepdown is organized as a workspace with multiple crates:
//!
//! 1. **stepdown-core** - Error types and the pass event model
//! 2. **stepdown-parser** - Tokenizer and line model
//! 3. **stepdown-camtools** - Program extent, realignment and the depth-pass engine
//! 4. **stepdown-settings** - Persistent defaults from TOML or JSON
//! 5. **stepdown** - Command-line binary that ties them together

pub mod cli;

use anyhow::Context;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

pub use cli::Cli;
pub use stepdown_camtools::{
    realign, Alignment, DepthPassGenerator, OutputStyle, PassParameters, Program,
};
pub use stepdown_core::{Error, Result, TracingListener};
pub use stepdown_settings::Config;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Output on stderr, never mixed with generated G-code
/// - RUST_LOG environment variable support
/// - `info` by default, `debug` when requested
pub fn init_logging(debug: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let level = if debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    let env_filter = EnvFilter::from_default_env().add_directive(level.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}

/// Settings file, if any, overlaid with command-line flags
pub fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load settings {}", path.display()))?,
        None => Config::load_default()?,
    };
    cli.apply(&mut config);
    config.validate()?;
    debug!("Settings: {:?}", config);
    Ok(config)
}

/// Turn program text into the full multi-pass output
pub fn process(text: &str, config: &Config) -> anyhow::Result<String> {
    let mut program = Program::from_text(text)?;
    info!(
        "Setup {} lines, body {} lines, finish {} lines",
        program.setup.len(),
        program.body.len(),
        program.finish.len()
    );

    realign(&mut program, config.output.alignment);

    let generator = DepthPassGenerator::new(config.pass_parameters(), config.output_style())?
        .with_listener(Arc::new(TracingListener));
    Ok(generator.render_program(&program)?)
}

fn write_output(path: Option<&Path>, output: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            debug!("Output to file {}", path.display());
            std::fs::write(path, output)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        None => {
            debug!("Output to screen");
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(output.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Run the tool for parsed arguments
///
/// Nothing is written until the whole output has been generated.
pub fn run(cli: &Cli) -> anyhow::Result<()> {
    info!("Starting");
    let config = resolve_config(cli)?;

    let text = std::fs::read_to_string(&cli.infile)
        .with_context(|| format!("Failed to read {}", cli.infile.display()))?;
    let output = process(&text, &config)?;

    write_output(cli.outfile.as_deref(), &output)?;
    info!("Done");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    const PROGRAM: &str = "%
G21
G90
M3 S10000

G0 Z5
G0 X0 Y0
G1 Z-4 F200
G1 X10
G1 Y10
G1 X0
G0 Z5
M5
M30
%
";

    fn write_settings(dir: &Path, body: &str) -> String {
        let path = dir.join("config.toml");
        std::fs::write(&path, body).unwrap();
        path.display().to_string()
    }

    #[test]
    fn test_run_writes_output_file() {
        let dir = TempDir::new().unwrap();
        let infile = dir.path().join("in.nc");
        let outfile = dir.path().join("out.nc");
        std::fs::write(&infile, PROGRAM).unwrap();
        std::fs::write(&outfile, "stale contents that must go\n").unwrap();
        let settings = write_settings(dir.path(), "");

        let cli = Cli::try_parse_from([
            "stepdown",
            "--config",
            settings.as_str(),
            infile.to_str().unwrap(),
            outfile.to_str().unwrap(),
        ])
        .unwrap();
        run(&cli).unwrap();

        let output = std::fs::read_to_string(&outfile).unwrap();
        assert!(output.starts_with("%\nG21\nG90\nM3S10000\n;Pass 1\n"));
        assert!(output.ends_with("M5\nM30\n%\n"));
        assert!(output.contains(";Pass 2\n"));
        assert!(!output.contains("stale"));
    }

    #[test]
    fn test_parse_error_names_the_line() {
        let dir = TempDir::new().unwrap();
        let infile = dir.path().join("in.nc");
        let outfile = dir.path().join("out.nc");
        std::fs::write(&infile, "G21\nG0 Z1\nG1 X1 X2\n").unwrap();
        let settings = write_settings(dir.path(), "");

        let cli = Cli::try_parse_from([
            "stepdown",
            "--config",
            settings.as_str(),
            infile.to_str().unwrap(),
            outfile.to_str().unwrap(),
        ])
        .unwrap();
        let err = run(&cli).unwrap_err();
        assert_eq!(format!("{:#}", err), "Failed to parse line 3 'G1 X1 X2': Multiple X in block");
        assert!(!outfile.exists());
    }

    #[test]
    fn test_missing_input_file() {
        let dir = TempDir::new().unwrap();
        let settings = write_settings(dir.path(), "");
        let infile = dir.path().join("absent.nc");
        let cli = Cli::try_parse_from([
            "stepdown",
            "--config",
            settings.as_str(),
            infile.to_str().unwrap(),
        ])
        .unwrap();
        let err = run(&cli).unwrap_err();
        assert!(format!("{:#}", err).starts_with("Failed to read "));
    }

    #[test]
    fn test_flags_win_over_settings_file() {
        let dir = TempDir::new().unwrap();
        let infile = dir.path().join("in.nc");
        let outfile = dir.path().join("out.nc");
        std::fs::write(&infile, PROGRAM).unwrap();
        let settings = write_settings(dir.path(), "[passes]\nincrement = -1.0\n");

        let cli = Cli::try_parse_from([
            "stepdown",
            "--config",
            settings.as_str(),
            "-i",
            "-2",
            infile.to_str().unwrap(),
            outfile.to_str().unwrap(),
        ])
        .unwrap();
        run(&cli).unwrap();

        let output = std::fs::read_to_string(&outfile).unwrap();
        assert!(output.contains(";Pass 2\n"));
        assert!(!output.contains(";Pass 3\n"));
    }

    #[test]
    fn test_invalid_settings_file_fails_before_reading_input() {
        let dir = TempDir::new().unwrap();
        let settings = write_settings(dir.path(), "[passes]\nincrement = 3.0\n");
        let args = ["stepdown", "--config", settings.as_str(), "never-read.nc"];
        let cli = Cli::try_parse_from(args).unwrap();
        let err = run(&cli).unwrap_err();
        assert!(format!("{:#}", err).starts_with("Failed to load settings"));
    }

    #[test]
    fn test_process_with_corner_alignment() {
        let mut config = Config::new();
        config.output.alignment = "corner".parse().unwrap();
        let output = process("G0 X5 Y5 Z1\nG1 Z-1\nG1 X8\nG0 Z1\n", &config).unwrap();
        assert_eq!(output, ";Pass 1\nG0X0Y0Z1\nG1Z-1\nG1X3\nG0Z1\n");
    }

    #[test]
    fn test_process_rejects_program_without_material() {
        let err = process("G0 X0 Y0 Z2\nG1 Z1\n", &Config::new()).unwrap_err();
        assert_eq!(err.to_string(), "MinZ > 0 (1), there is no material to cut");
    }
}
