//! Numderline
pub mod core;
pub mod data;
pub mod features;
pub mod glyphs;
pub mod logging;
pub mod pipeline;
#[cfg(test)]
mod tests;
