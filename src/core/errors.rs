//! Error taxonomy for a patch run
//!
//! Configuration errors stop the run before any font is opened. Everything
//! else is scoped to a single font resource: the pipeline reports it and
//! moves on to the next resource.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BuildError {
    /// An option value could not be interpreted
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A glyph the patch depends on is absent from the font
    #[error("missing glyph {what} in {resource}")]
    MissingGlyph { what: String, resource: String },

    /// A generated variant would overwrite an existing glyph
    #[error("glyph name already taken: {0}")]
    DuplicateGlyphName(String),

    /// The feature compiler rejected the generated rules.
    ///
    /// This points at a defect in the rule generator, not at user input, so
    /// the diagnostic is kept exactly as the compiler printed it.
    #[error("feature compilation failed:\n{diagnostic}")]
    FeatureCompile { diagnostic: String },

    /// Writing the output failed
    #[error("could not write {}: {message}", path.display())]
    Serialization { path: PathBuf, message: String },

    /// A source could not be opened or parsed
    #[error("could not open {}: {message}", path.display())]
    Load { path: PathBuf, message: String },
}

impl BuildError {
    /// Short category name used in reports
    pub fn kind(&self) -> &'static str {
        match self {
            BuildError::Configuration(_) => "ConfigurationError",
            BuildError::MissingGlyph { .. } => "MissingGlyphError",
            BuildError::DuplicateGlyphName(_) => "DuplicateGlyphNameError",
            BuildError::FeatureCompile { .. } => "FeatureCompileError",
            BuildError::Serialization { .. } => "SerializationError",
            BuildError::Load { .. } => "LoadError",
        }
    }

    pub fn serialization(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        BuildError::Serialization {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub fn load(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        BuildError::Load {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

pub type BuildResult<T> = Result<T, BuildError>;
