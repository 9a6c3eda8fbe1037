//! Combining generated rules with a font's own feature file

use crate::features::ir::FeatureProgram;
use crate::features::printer::{render, render_body, render_language_systems};

fn declares_language_systems(text: &str) -> bool {
    text.lines()
        .map(|line| line.trim_start())
        .any(|line| line.starts_with("languagesystem "))
}

/// Append the program to `existing`.
///
/// Language systems must precede everything else in a feature file. A font
/// that declares its own keeps them (ours are dropped); otherwise ours are
/// placed at the very top.
pub fn merge_feature_text(existing: &str, program: &FeatureProgram) -> String {
    if existing.trim().is_empty() {
        return render(program);
    }

    let mut out = String::new();
    if !declares_language_systems(existing) {
        out.push_str(&render_language_systems(program));
        out.push('\n');
    }
    out.push_str(existing);
    if !existing.ends_with('\n') {
        out.push('\n');
    }
    out.push('\n');
    out.push_str(&render_body(program));
    out
}
