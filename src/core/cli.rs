//! Command line interface for the Numderline font patcher
//!
//! Handles parsing command line arguments and merging them over the user
//! config file into the settings for one run.

use crate::core::config_file::ConfigFile;
use crate::core::errors::{BuildError, BuildResult};
use crate::core::settings::{GapSize, GroupingConfig, RenameStyle};
use crate::pipeline::OutputOptions;
use clap::Parser;
use std::path::PathBuf;
use tracing::debug;

/// Numderline CLI arguments
///
/// Examples:
///   numderline MyFont.ufo                      # Patch with defaults into ./out
///   numderline Family.designspace              # Patch every source of a designspace
///   numderline --monospace --gap 120 Mono.ufo  # Monospace font, 120 unit gap
///   numderline --feature liga Font.ufo         # Turn grouping on with `liga`
///   numderline --preview 1234567.89 Font.ufo   # Show the grouping without writing
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    name = "numderline",
    version,
    about = "Patches fonts so that long numbers are grouped",
    long_about = "Numderline adds OpenType substitution rules and digit variants to a font so that digit runs are shown in groups (thousands, decimal fractions, hex nibbles) in any application that applies contextual alternates."
)]
pub struct CliArgs {
    /// Font sources to patch (UFO directories or designspace files)
    #[clap(required = true, value_name = "FONT")]
    pub fonts: Vec<PathBuf>,

    /// Keep the original font names
    #[clap(
        long = "no-rename",
        help = "Don't add \" with Numderline\" to the font name"
    )]
    pub no_rename: bool,

    /// Feature that turns grouping on
    #[clap(
        long = "feature",
        value_name = "TAG",
        help = "Feature tag that switches grouping on (default: calt)"
    )]
    pub feature: Option<String>,

    /// Keep every digit cell the same width
    #[clap(
        long = "monospace",
        help = "Keep digit advances fixed and shift digits to open the gaps",
        long_help = "Monospace mode: instead of widening the digits next to a group boundary, every digit of a group is shifted so the gap opens inside the unchanged cells. Digits are squished to make room unless --squish-x is given."
    )]
    pub monospace: bool,

    /// Width of the gap between groups
    #[clap(
        long = "gap",
        value_name = "SIZE",
        allow_hyphen_values = true,
        help = "Gap between groups: font units, or a character whose width to use (default: ,)"
    )]
    pub gap: Option<String>,

    #[clap(long = "squish-x", value_name = "FACTOR", help = "Horizontal scale of digit variants")]
    pub squish_x: Option<f64>,

    #[clap(long = "squish-y", value_name = "FACTOR", help = "Vertical scale of digit variants")]
    pub squish_y: Option<f64>,

    #[clap(long = "squish-all", help = "Also squish the font's own digits")]
    pub squish_all: bool,

    /// Draw a small mark under every variant, showing its role
    #[clap(
        long = "debug-annotate",
        help = "Mark each digit variant with its role (for debugging the rules)"
    )]
    pub debug_annotate: bool,

    /// Behave like the first patcher
    #[clap(
        long = "legacy",
        help = "Decimal grouping only, proportional, short rename suffix"
    )]
    pub legacy: bool,

    #[clap(long = "no-hex", help = "Don't group hexadecimal numbers")]
    pub no_hex: bool,

    #[clap(
        long = "output-dir",
        short = 'o',
        value_name = "DIR",
        help = "Directory for patched fonts (default: out)"
    )]
    pub output_dir: Option<PathBuf>,

    #[clap(long = "emit-ufo", help = "Write the patched UFO instead of a TTF")]
    pub emit_ufo: bool,

    #[clap(
        long = "fontc",
        value_name = "PATH",
        help = "fontc executable used to build the TTF (default: fontc)"
    )]
    pub fontc: Option<PathBuf>,

    #[clap(
        long = "config",
        value_name = "FILE",
        help = "Settings file (default: ~/.config/numderline/settings.json)"
    )]
    pub config: Option<PathBuf>,

    #[clap(
        long = "preview",
        value_name = "TEXT",
        help = "Print TEXT as every feature would group it; nothing is written"
    )]
    pub preview: Option<String>,

    #[clap(long = "log-file", help = "Also write the log to ~/.config/numderline/logs")]
    pub log_file: bool,

    #[clap(short = 'v', long = "verbose", action = clap::ArgAction::Count, help = "More output (-v debug, -vv trace)")]
    pub verbose: u8,
}

impl CliArgs {
    /// Read the config file named by `--config`, or the default one
    pub fn load_config_file(&self) -> BuildResult<Option<ConfigFile>> {
        match &self.config {
            Some(path) => ConfigFile::load(path).map(Some),
            None => ConfigFile::load_default(),
        }
    }

    /// Settings for the run.
    ///
    /// Priority order:
    /// 1. CLI arguments
    /// 2. Config file
    /// 3. Built-in defaults (or the legacy subset with `--legacy`)
    pub fn resolve(&self, file: Option<ConfigFile>) -> BuildResult<(GroupingConfig, OutputOptions)> {
        let file = file.unwrap_or_default();
        let mut config = if self.legacy {
            GroupingConfig::legacy()
        } else {
            GroupingConfig::default()
        };

        if let Some(gap) = self.gap.as_ref().or(file.gap.as_ref()) {
            config.gap = gap.parse::<GapSize>()?;
        }
        config.squish_x = self.squish_x.or(file.squish_x).or(config.squish_x);
        if let Some(sy) = self.squish_y.or(file.squish_y) {
            config.squish_y = sy;
        }
        if let Some(tag) = self.feature.clone().or(file.feature) {
            config.feature_tag = tag;
        }
        config.monospace = self.monospace || (!self.legacy && file.monospace.unwrap_or(false));
        config.squish_all = self.squish_all || file.squish_all.unwrap_or(config.squish_all);
        config.debug_annotate = self.debug_annotate;
        if self.no_hex || file.hex == Some(false) {
            config.hex = false;
        } else if file.hex == Some(true) && !self.legacy {
            config.hex = true;
        }
        if self.no_rename || file.rename == Some(false) {
            config.rename = RenameStyle::Off;
        }
        if let Some(ch) = file.dot_separator {
            config.dot_separator = ch;
        }
        if let Some(ch) = file.comma_separator {
            config.comma_separator = ch;
        }
        if let Some(reserved) = file.reserved_names {
            config.reserved_names = reserved;
        }

        if self.legacy && self.monospace {
            return Err(BuildError::Configuration(
                "--legacy cannot be combined with --monospace".to_string(),
            ));
        }
        config.validate()?;

        let defaults = OutputOptions::default();
        let output = OutputOptions {
            output_dir: self
                .output_dir
                .clone()
                .or(file.output_dir)
                .unwrap_or(defaults.output_dir),
            emit_ufo: self.emit_ufo,
            fontc: self.fontc.clone().or(file.fontc).unwrap_or(defaults.fontc),
            preview: self.preview.clone(),
        };
        debug!(?config, ?output, "resolved settings");
        Ok((config, output))
    }
}
