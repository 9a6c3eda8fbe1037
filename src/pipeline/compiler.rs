//! Binary font output through the `fontc` executable

use crate::core::errors::{BuildError, BuildResult};
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info};

pub const DEFAULT_FONTC: &str = "fontc";

/// Prefix of the error `fontc` reports when its feature compiler gives up
const FEA_FAILURE: &str = "fea compilation failure";

pub struct FontCompiler {
    executable: PathBuf,
}

impl FontCompiler {
    pub fn new(executable: impl Into<PathBuf>) -> Self {
        Self {
            executable: executable.into(),
        }
    }

    /// Compile a UFO into a TrueType font at `output`
    pub fn compile(&self, ufo_path: &Path, output_path: &Path) -> BuildResult<()> {
        let build_dir = tempfile::tempdir().map_err(|e| BuildError::serialization(output_path, e))?;

        let mut cmd = Command::new(&self.executable);
        cmd.arg("--build-dir")
            .arg(build_dir.path())
            .arg("--output-file")
            .arg(output_path)
            .arg(ufo_path);
        debug!(?cmd, "running fontc");

        let output = cmd.output().map_err(|e| {
            BuildError::serialization(
                output_path,
                format!("could not run {}: {e}", self.executable.display()),
            )
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(classify_failure(output_path, &stderr));
        }

        info!(path = %output_path.display(), "compiled font");
        Ok(())
    }
}

impl Default for FontCompiler {
    fn default() -> Self {
        Self::new(DEFAULT_FONTC)
    }
}

/// Feature parser diagnostics are kept verbatim; anything else is an output
/// failure
pub fn classify_failure(output_path: &Path, stderr: &str) -> BuildError {
    if stderr.to_ascii_lowercase().contains(FEA_FAILURE) || has_fea_location(stderr) {
        BuildError::FeatureCompile {
            diagnostic: stderr.trim_end().to_string(),
        }
    } else {
        BuildError::serialization(output_path, stderr.trim_end())
    }
}

/// Parser diagnostics point into the source as `features.fea:LINE:COL`
fn has_fea_location(stderr: &str) -> bool {
    stderr.match_indices(".fea:").any(|(at, marker)| {
        let mut parts = stderr[at + marker.len()..].splitn(3, ':');
        let line = parts.next().unwrap_or_default();
        let column = parts.next().unwrap_or_default();
        !line.is_empty()
            && line.chars().all(|c| c.is_ascii_digit())
            && column.starts_with(|c: char| c.is_ascii_digit())
    })
}
