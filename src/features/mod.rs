//! OpenType feature generation for digit grouping

pub mod compiler;
pub mod ir;
pub mod merge;
pub mod printer;
pub mod simulate;

pub use compiler::{compile, CompileOptions, ENTRY_LOOKUPS, LOCALE_FEATURES};
pub use ir::FeatureProgram;
pub use merge::merge_feature_text;
