//! Font sources: loading, editing and naming

pub mod naming;
pub mod ufo;

pub use ufo::{FontEditor, FontResource, UfoFont};
