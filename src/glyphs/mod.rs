//! Digit roles and the glyph variants that implement them

pub mod factory;
pub mod roles;

pub use factory::GlyphVariantFactory;
pub use roles::{DigitRole, GlyphTables, Radix};
