//! Per-resource patch pipeline
//!
//! Each font resource is processed in its own [`Session`]: open, rename,
//! generate digit variants, compile and merge the grouping features, then
//! write the result. A failing resource is reported and skipped; the
//! remaining resources are still processed.

pub mod compiler;

use crate::core::errors::{BuildError, BuildResult};
use crate::core::settings::GroupingConfig;
use crate::data::naming::{self, NameSuffix};
use crate::data::ufo::{self, FontEditor, FontResource, UfoFont};
use crate::features::simulate::{self, Shaper};
use crate::features::{self, CompileOptions, FeatureProgram};
use crate::glyphs::{GlyphTables, GlyphVariantFactory};
use compiler::FontCompiler;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, info_span};

/// Where and how results are written
#[derive(Debug, Clone, PartialEq)]
pub struct OutputOptions {
    pub output_dir: PathBuf,
    /// Save the patched UFO instead of compiling a binary font
    pub emit_ufo: bool,
    pub fontc: PathBuf,
    /// Shape this text with every generated feature instead of writing
    pub preview: Option<String>,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("out"),
            emit_ufo: false,
            fontc: PathBuf::from(compiler::DEFAULT_FONTC),
            preview: None,
        }
    }
}

/// What processing a resource produced
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Written { path: PathBuf, full_name: String },
    /// One line per feature
    Preview(Vec<String>),
}

#[derive(Debug, Default)]
pub struct RunSummary {
    pub outcomes: Vec<(PathBuf, Outcome)>,
    pub failures: Vec<(PathBuf, BuildError)>,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Working state of one font resource
pub struct Session<'a> {
    config: &'a GroupingConfig,
    resource: FontResource,
    font: UfoFont,
    full_name: String,
    tables: GlyphTables,
    program: FeatureProgram,
}

impl<'a> Session<'a> {
    pub fn open(config: &'a GroupingConfig, resource: &FontResource) -> BuildResult<Self> {
        let font = UfoFont::open(resource)?;
        Ok(Self::with_font(config, resource.clone(), font))
    }

    pub fn with_font(config: &'a GroupingConfig, resource: FontResource, font: UfoFont) -> Self {
        let full_name = naming::full_name(font.info());
        Self {
            config,
            resource,
            font,
            full_name,
            tables: GlyphTables::default(),
            program: FeatureProgram::default(),
        }
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    pub fn font(&self) -> &UfoFont {
        &self.font
    }

    pub fn program(&self) -> &FeatureProgram {
        &self.program
    }

    /// Rename, build the variants and install the grouping features
    pub fn patch(&mut self) -> BuildResult<()> {
        let factory = GlyphVariantFactory::new(&self.font, self.config)?;

        if let Some(suffix) = NameSuffix::for_config(self.config, factory.gap(), factory.squish_x())
        {
            self.full_name = naming::rename(self.font.info_mut(), &suffix);
            info!(name = %self.full_name, "renamed font");
        }

        self.tables = factory.generate(&mut self.font)?;
        if self.config.squish_all {
            factory.squish_base_digits(&mut self.font, &self.tables)?;
        }

        self.program = features::compile(&self.tables, &CompileOptions::from(self.config));
        let merged = features::merge_feature_text(self.font.feature_text(), &self.program);
        self.font.set_feature_text(merged);
        debug!(
            lookups = self.program.lookups.len(),
            features = self.program.features.len(),
            "installed grouping features"
        );
        Ok(())
    }

    /// Write the patched font into `output.output_dir`
    pub fn write(&self, output: &OutputOptions, compiler: &FontCompiler) -> BuildResult<PathBuf> {
        let extension = if output.emit_ufo { "ufo" } else { "ttf" };
        let file_name =
            naming::output_file_name(&self.full_name, &self.config.reserved_names, extension);
        fs::create_dir_all(&output.output_dir)
            .map_err(|e| BuildError::serialization(&output.output_dir, e))?;
        let target = output.output_dir.join(file_name);

        if output.emit_ufo {
            self.font.save(&target)?;
        } else {
            // The scratch UFO sits beside the source so that relative
            // `include` statements in its features still resolve.
            let parent = self
                .resource
                .path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let scratch = tempfile::Builder::new()
                .prefix(".numderline-")
                .suffix(".ufo")
                .tempdir_in(parent)
                .map_err(|e| BuildError::serialization(parent, e))?;
            self.font.save(scratch.path())?;
            compiler.compile(scratch.path(), &target)?;
        }
        info!(path = %target.display(), "wrote patched font");
        Ok(target)
    }

    /// Shape `text` with each generated feature, one line per feature
    pub fn preview(&self, text: &str) -> Vec<String> {
        let glyphs = simulate::text_to_glyphs(text, |ch| self.font.glyph_for_char(ch));
        let names: std::collections::HashMap<String, char> = text
            .chars()
            .filter_map(|ch| self.font.glyph_for_char(ch).map(|name| (name, ch)))
            .chain(
                [self.tables.point.clone(), self.tables.comma.clone()]
                    .into_iter()
                    .flatten()
                    .filter_map(|name| {
                        let ch = self.font.glyph(&name)?.codepoints.iter().next()?;
                        Some((name, ch))
                    }),
            )
            .collect();

        let shaper = Shaper::new(&self.program);
        let entry = self.config.feature_tag.as_str();
        self.program
            .features
            .iter()
            .map(|feature| {
                let mut active = vec![feature.tag.as_str()];
                if feature.tag != entry {
                    active.insert(0, entry);
                }
                let shaped = shaper.shape(&glyphs, &active);
                let shown = simulate::visualize(&shaped, &self.tables, |name| names.get(name).copied());
                format!("{:<5} {shown}    [{}]", feature.tag, shaped.join(" "))
            })
            .collect()
    }
}

/// Drives sessions over every input
pub struct Pipeline {
    config: GroupingConfig,
    output: OutputOptions,
    compiler: FontCompiler,
}

impl Pipeline {
    /// Fails with a configuration error before any font is opened
    pub fn new(config: GroupingConfig, output: OutputOptions) -> BuildResult<Self> {
        config.validate()?;
        let compiler = FontCompiler::new(output.fontc.clone());
        Ok(Self {
            config,
            output,
            compiler,
        })
    }

    pub fn config(&self) -> &GroupingConfig {
        &self.config
    }

    pub fn process_resource(&self, resource: &FontResource) -> BuildResult<Outcome> {
        let mut session = Session::open(&self.config, resource)?;
        session.patch()?;
        if let Some(text) = &self.output.preview {
            return Ok(Outcome::Preview(session.preview(text)));
        }
        let path = session.write(&self.output, &self.compiler)?;
        Ok(Outcome::Written {
            path,
            full_name: session.full_name,
        })
    }

    pub fn run(&self, inputs: &[PathBuf]) -> RunSummary {
        let mut summary = RunSummary::default();
        for input in inputs {
            let resources = match ufo::resources_in(input) {
                Ok(resources) => resources,
                Err(e) => {
                    error!(input = %input.display(), kind = e.kind(), "{e}");
                    summary.failures.push((input.clone(), e));
                    continue;
                }
            };
            for resource in resources {
                let _span = info_span!("resource", path = %resource.path.display()).entered();
                match self.process_resource(&resource) {
                    Ok(outcome) => summary.outcomes.push((resource.path, outcome)),
                    Err(e) => {
                        error!(kind = e.kind(), "{e}");
                        summary.failures.push((resource.path, e));
                    }
                }
            }
        }
        info!(
            processed = summary.outcomes.len(),
            failed = summary.failures.len(),
            "run finished"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::settings::RenameStyle;
    use crate::features::compiler::{
        CAPTURE, DOTS_TO_COMMAS, GROUP_DECIMALS, GROUP_DIGITS, REFLOW_DIGITS,
    };
    use crate::tests::fixtures;

    fn write_source(dir: &Path, font: UfoFont) -> PathBuf {
        let path = dir.join("Test-Regular.ufo");
        font.save(&path).unwrap();
        path
    }

    fn ufo_output(dir: &Path) -> OutputOptions {
        OutputOptions {
            output_dir: dir.join("out"),
            emit_ufo: true,
            ..OutputOptions::default()
        }
    }

    #[test]
    fn test_end_to_end_emits_grouping_features() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), fixtures::minimal_font());
        let pipeline = Pipeline::new(GroupingConfig::default(), ufo_output(dir.path())).unwrap();

        let summary = pipeline.run(&[source]);
        assert!(summary.is_success(), "{:?}", summary.failures);
        let Outcome::Written { path, full_name } = &summary.outcomes[0].1 else {
            panic!("expected a written font");
        };
        assert!(full_name.starts_with("Test Sans Regular with Numderline"));
        assert!(path.ends_with(format!("{full_name}.ufo")));

        let font = ufo::load_ufo_from_path(path).unwrap();
        let text = font.features.as_str();
        for lookup in [CAPTURE, DOTS_TO_COMMAS, GROUP_DIGITS, GROUP_DECIMALS, REFLOW_DIGITS] {
            assert!(text.contains(&format!("lookup {lookup} {{")), "{lookup} missing");
        }
        let calt = &text[text.find("feature calt {").unwrap()..];
        let calt = &calt[..calt.find("} calt;").unwrap()];
        for lookup in [CAPTURE, GROUP_DIGITS, REFLOW_DIGITS] {
            assert!(calt.contains(&format!("lookup {lookup};")));
        }
        assert!(font.default_layer().get_glyph("sep_comma_l_d1").is_some());
        assert!(font.default_layer().get_glyph("one").is_some());
    }

    #[test]
    fn test_existing_features_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let mut font = fixtures::minimal_font();
        font.set_feature_text("languagesystem DFLT dflt;\n\nfeature kern {\n} kern;\n".to_string());
        let source = write_source(dir.path(), font);
        let config = GroupingConfig {
            rename: RenameStyle::Off,
            ..GroupingConfig::default()
        };
        let pipeline = Pipeline::new(config, ufo_output(dir.path())).unwrap();

        let summary = pipeline.run(&[source]);
        assert!(summary.is_success());
        let font = ufo::load_ufo_from_path(dir.path().join("out/Test Sans Regular.ufo")).unwrap();
        assert!(font.features.starts_with("languagesystem DFLT dflt;"));
        assert_eq!(font.features.matches("languagesystem").count(), 1);
        assert!(font.features.contains("feature kern"));
    }

    #[test]
    fn test_failed_resource_does_not_stop_the_run() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("Broken.ufo");
        fixtures::font_without('3').save(&broken).unwrap();
        let good = write_source(dir.path(), fixtures::minimal_font());
        let missing = dir.path().join("Missing.ufo");

        let pipeline = Pipeline::new(GroupingConfig::default(), ufo_output(dir.path())).unwrap();
        let summary = pipeline.run(&[broken.clone(), missing, good]);

        assert!(!summary.is_success());
        assert_eq!(summary.outcomes.len(), 1);
        assert_eq!(summary.failures.len(), 2);
        assert_eq!(summary.failures[0].0, broken);
        assert_eq!(summary.failures[0].1.kind(), "MissingGlyphError");
        assert_eq!(summary.failures[1].1.kind(), "LoadError");
    }

    #[test]
    fn test_invalid_config_fails_before_opening() {
        let config = GroupingConfig {
            feature_tag: "ss02".to_string(),
            ..GroupingConfig::default()
        };
        let err = Pipeline::new(config, OutputOptions::default()).err().unwrap();
        assert_eq!(err.kind(), "ConfigurationError");
    }

    #[test]
    fn test_reserved_name_in_output() {
        let dir = tempfile::tempdir().unwrap();
        let mut font = fixtures::minimal_font();
        font.info_mut().family_name = Some("Source Mono".to_string());
        let source = write_source(dir.path(), font);
        let pipeline = Pipeline::new(GroupingConfig::legacy(), ufo_output(dir.path())).unwrap();

        let summary = pipeline.run(&[source]);
        let Outcome::Written { path, full_name } = &summary.outcomes[0].1 else {
            panic!("expected a written font");
        };
        assert_eq!(full_name, "Source Mono Regular with Numderline");
        assert!(path.ends_with("Sauce Mono Regular with Numderline.ufo"));
    }

    #[test]
    fn test_preview_shapes_every_feature() {
        let config = GroupingConfig::default();
        let resource = FontResource {
            path: PathBuf::from("synthetic.ufo"),
            origin: PathBuf::from("synthetic.ufo"),
        };
        let mut session = Session::with_font(&config, resource, fixtures::synthetic_font());
        session.patch().unwrap();

        let lines = session.preview("1234567.891 0xdeadbeef");
        assert_eq!(lines.len(), 5);
        assert!(lines[0].starts_with("calt  1 234 567.891 0xdead beef"));
        assert!(lines[1].starts_with("ss01  1,234,567.891 0xdead beef"));
        assert!(lines[4].starts_with("ss04  1.234.567,891 0xdead beef"));
    }

    #[test]
    #[ignore = "Requires the fontc executable on PATH"]
    fn test_compiles_with_fontc() {
        let dir = tempfile::tempdir().unwrap();
        let source = write_source(dir.path(), fixtures::minimal_font());
        let output = OutputOptions {
            output_dir: dir.path().join("out"),
            ..OutputOptions::default()
        };
        let pipeline = Pipeline::new(GroupingConfig::default(), output).unwrap();
        let summary = pipeline.run(&[source]);
        assert!(summary.is_success(), "{:?}", summary.failures);
        let Outcome::Written { path, .. } = &summary.outcomes[0].1 else {
            panic!("expected a written font");
        };
        assert!(path.exists());
    }
}
