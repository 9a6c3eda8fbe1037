//! Derived digit glyphs
//!
//! Every variant starts as a clone of a base digit. The base digits themselves
//! are only modified by [`GlyphVariantFactory::squish_base_digits`].

use crate::core::errors::{BuildError, BuildResult};
use crate::core::settings::{GapSize, GroupingConfig};
use crate::data::ufo::FontEditor;
use crate::glyphs::roles::{DigitClass, DigitRole, GlyphTables, Radix, SeparatorKind, Side};
use kurbo::Affine;
use tracing::{debug, info, warn};

/// Scale of the debug annotation mark
const ANNOTATION_SCALE: f64 = 0.3;

/// Duplicate `source` as `new_name`
pub fn clone(font: &mut impl FontEditor, source: &str, new_name: &str) -> BuildResult<()> {
    font.clone_glyph(source, new_name)
}

/// Move the glyph's outline horizontally
pub fn shift(font: &mut impl FontEditor, name: &str, dx: f64) -> BuildResult<()> {
    if dx == 0.0 {
        return Ok(());
    }
    font.transform(name, Affine::translate((dx, 0.0)))
}

/// Scale about the origin, then recentre inside the unchanged advance
pub fn squish(font: &mut impl FontEditor, name: &str, sx: f64, sy: f64) -> BuildResult<()> {
    if sx == 1.0 && sy == 1.0 {
        return Ok(());
    }
    let width = font.width(name).unwrap_or(0.0);
    font.transform(name, Affine::scale_non_uniform(sx, sy))?;
    shift(font, name, (1.0 - sx) * width / 2.0)
}

/// Open a gap of `|gap|` units at `edge` and draw `separator` centred in it.
///
/// `edge` is the side of the glyph that faces the group boundary. In
/// proportional fonts the advance grows by the gap. Monospace glyphs keep
/// their advance for a positive gap, since the group's phase shifts have
/// already cleared the strip. A negative monospace gap tightens the boundary
/// instead: the advance shrinks by `|gap|` and the separator straddles the
/// boundary.
pub fn insert_separator(
    font: &mut impl FontEditor,
    name: &str,
    separator: Option<&str>,
    gap: f64,
    edge: Side,
    monospace: bool,
) -> BuildResult<()> {
    let width = font.width(name).unwrap_or(0.0);
    let amount = gap.abs();

    let centre = match (monospace, gap >= 0.0, edge) {
        (false, _, Side::Left) => {
            font.set_width(name, width + amount)?;
            shift(font, name, amount)?;
            amount / 2.0
        }
        (false, _, Side::Right) => {
            font.set_width(name, width + amount)?;
            width + amount / 2.0
        }
        (true, true, Side::Left) => amount / 2.0,
        (true, true, Side::Right) => width - amount / 2.0,
        (true, false, Side::Left) => {
            font.set_width(name, (width - amount).max(0.0))?;
            shift(font, name, -amount)?;
            0.0
        }
        (true, false, Side::Right) => {
            let narrowed = (width - amount).max(0.0);
            font.set_width(name, narrowed)?;
            narrowed
        }
    };

    if let Some(separator) = separator {
        let (lo, hi) = font
            .ink_extent(separator)
            .unwrap_or_else(|| (0.0, font.width(separator).unwrap_or(0.0)));
        let dx = centre - (lo + hi) / 2.0;
        font.overlay(name, separator, Affine::translate((dx, 0.0)))?;
    }
    Ok(())
}

/// Stamp a small copy of `mark` below the glyph. Metrics are untouched.
pub fn annotate(font: &mut impl FontEditor, name: &str, mark: &str) -> BuildResult<()> {
    let width = font.width(name).unwrap_or(0.0);
    let mark_width = font.width(mark).unwrap_or(0.0);
    let dx = (width - mark_width * ANNOTATION_SCALE) / 2.0;
    let dy = -width * 0.4;
    font.overlay(
        name,
        mark,
        Affine::translate((dx, dy)) * Affine::scale(ANNOTATION_SCALE),
    )
}

/// Turn a gap option into font units.
///
/// A character token means "as wide as that glyph". When that glyph is exactly
/// as wide as a digit (typical for monospace fonts) a full cell would be far
/// too much, so a third of the digit width is used instead.
pub fn resolve_gap(font: &impl FontEditor, gap: GapSize, digit_width: f64) -> BuildResult<f64> {
    match gap {
        GapSize::Literal(value) => Ok(value),
        GapSize::WidthOf(ch) => {
            let width = font
                .glyph_for_char(ch)
                .and_then(|name| font.width(&name))
                .ok_or_else(|| BuildError::MissingGlyph {
                    what: format!("for '{ch}' (gap size)"),
                    resource: font.label().to_string(),
                })?;
            if (width - digit_width).abs() < 1e-6 {
                Ok(digit_width / 3.0)
            } else {
                Ok(width)
            }
        }
    }
}

/// Horizontal offset of the digit at index `j` (from the group's left) in a
/// monospace group of `group_size` cells.
///
/// The group is compressed linearly so that a strip of `|gap|` opens at its
/// left edge (positive `gap`) or right edge (negative `gap`). Advances stay
/// untouched, so a complete group is always `group_size` cells wide.
pub fn phase_offset(gap: f64, j: usize, group_size: usize) -> f64 {
    let t = (2 * j + 1) as f64 / (2 * group_size) as f64;
    if gap >= 0.0 {
        gap * (1.0 - t)
    } else {
        gap * t
    }
}

/// Base glyphs of a radix, found by code point
pub fn base_class(font: &impl FontEditor, radix: Radix) -> Option<DigitClass> {
    let glyphs = radix
        .chars()
        .chars()
        .map(|ch| font.glyph_for_char(ch))
        .collect::<Option<Vec<_>>>()?;
    DigitClass::new(radix, glyphs)
}

/// Produces the variant glyphs for one font
pub struct GlyphVariantFactory<'a> {
    config: &'a GroupingConfig,
    digit_width: f64,
    gap: f64,
    squish_x: f64,
}

impl<'a> GlyphVariantFactory<'a> {
    /// Measure the font and resolve the gap and squish settings
    pub fn new(font: &impl FontEditor, config: &'a GroupingConfig) -> BuildResult<Self> {
        let zero = font
            .glyph_for_char('0')
            .ok_or_else(|| BuildError::MissingGlyph {
                what: "for '0'".to_string(),
                resource: font.label().to_string(),
            })?;
        let digit_width = font.width(&zero).unwrap_or(0.0);
        let gap = resolve_gap(font, config.gap, digit_width)?;
        let squish_x = config.effective_squish_x(digit_width, gap);

        debug!(digit_width, gap, squish_x, "resolved variant geometry");
        Ok(Self {
            config,
            digit_width,
            gap,
            squish_x,
        })
    }

    pub fn gap(&self) -> f64 {
        self.gap
    }

    pub fn squish_x(&self) -> f64 {
        self.squish_x
    }

    /// Create every variant the feature compiler can address
    pub fn generate(&self, font: &mut impl FontEditor) -> BuildResult<GlyphTables> {
        let mut tables = GlyphTables::default();

        let decimal = match base_class(font, Radix::Decimal) {
            Some(class) => class,
            None => {
                let missing: String = Radix::Decimal
                    .chars()
                    .chars()
                    .filter(|&ch| font.glyph_for_char(ch).is_none())
                    .collect();
                return Err(BuildError::MissingGlyph {
                    what: format!("for digits '{missing}'"),
                    resource: font.label().to_string(),
                });
            }
        };
        if self.config.monospace {
            self.check_monospace(font, &decimal);
        }
        tables.classes.insert(DigitRole::Plain(Radix::Decimal), decimal);

        if self.config.hex {
            for radix in [Radix::Hex, Radix::HexUpper] {
                match base_class(font, radix) {
                    Some(class) => {
                        tables.classes.insert(DigitRole::Plain(radix), class);
                    }
                    None => debug!(?radix, "hex letters incomplete, skipping"),
                }
            }
            tables.hex_prefix = ['x', 'X']
                .into_iter()
                .filter_map(|ch| font.glyph_for_char(ch))
                .collect();
        }

        tables.point = font.glyph_for_char('.');
        tables.comma = font.glyph_for_char(self.config.comma_separator);

        let mut separators = vec![SeparatorKind::Space];
        if tables.comma.is_some() {
            separators.push(SeparatorKind::Comma);
        }
        if font.glyph_for_char(self.config.dot_separator).is_some() {
            separators.push(SeparatorKind::Dot);
        }

        let mut generated = 0;
        for radix in Radix::ALL {
            let Some(base) = tables.class(DigitRole::Plain(radix)).cloned() else {
                continue;
            };
            for role in DigitRole::roles_for(radix, &separators) {
                for (index, base_name) in base.glyphs().iter().enumerate() {
                    self.build_variant(font, role, index, base_name)?;
                    generated += 1;
                }
                tables.classes.insert(role, DigitClass::for_role(role));
            }
        }

        info!(glyphs = generated, font = font.label(), "generated digit variants");
        Ok(tables)
    }

    /// Squish the font's own decimal digits in place
    pub fn squish_base_digits(
        &self,
        font: &mut impl FontEditor,
        tables: &GlyphTables,
    ) -> BuildResult<()> {
        if let Some(digits) = tables.class(DigitRole::Plain(Radix::Decimal)) {
            for name in digits.glyphs() {
                squish(font, name, self.squish_x, self.config.squish_y)?;
            }
        }
        Ok(())
    }

    fn build_variant(
        &self,
        font: &mut impl FontEditor,
        role: DigitRole,
        index: usize,
        base: &str,
    ) -> BuildResult<()> {
        let name = role.glyph_name(index);
        clone(font, base, &name)?;
        squish(font, &name, self.squish_x, self.config.squish_y)?;

        let monospace = self.config.monospace;
        // Width of the strip the phase shifts open; a negative gap opens none
        let strip = self.gap.max(0.0);
        match role {
            DigitRole::PhaseShiftPositional(phase, side, radix) if monospace => {
                let k = radix.group_size();
                let (strip, j) = match side {
                    Side::Left => (strip, k - phase.number()),
                    Side::Right => (-strip, phase.number() - 1),
                };
                shift(font, &name, phase_offset(strip, j, k))?;
            }
            DigitRole::LeftGroupWithSeparator(kind, radix) => {
                if monospace {
                    shift(font, &name, phase_offset(strip, 0, radix.group_size()))?;
                }
                let separator = self.separator_glyph(font, kind);
                insert_separator(
                    font,
                    &name,
                    separator.as_deref(),
                    self.gap,
                    Side::Left,
                    monospace,
                )?;
            }
            DigitRole::RightGroupWithSeparator(kind) => {
                let k = Radix::Decimal.group_size();
                if monospace {
                    shift(font, &name, phase_offset(-strip, k - 1, k))?;
                }
                let separator = self.separator_glyph(font, kind);
                insert_separator(
                    font,
                    &name,
                    separator.as_deref(),
                    self.gap,
                    Side::Right,
                    monospace,
                )?;
            }
            _ => {}
        }

        if self.config.debug_annotate {
            match annotation_mark(role).and_then(|ch| font.glyph_for_char(ch)) {
                Some(mark) => annotate(font, &name, &mark)?,
                None => debug!(glyph = %name, "no annotation mark available"),
            }
        }
        Ok(())
    }

    fn separator_glyph(&self, font: &impl FontEditor, kind: SeparatorKind) -> Option<String> {
        match kind {
            SeparatorKind::Space => None,
            SeparatorKind::Dot => font.glyph_for_char(self.config.dot_separator),
            SeparatorKind::Comma => font.glyph_for_char(self.config.comma_separator),
        }
    }

    fn check_monospace(&self, font: &impl FontEditor, digits: &DigitClass) {
        let uneven = digits
            .glyphs()
            .iter()
            .filter_map(|name| font.width(name))
            .any(|width| (width - self.digit_width).abs() > 1e-6);
        if uneven {
            warn!(
                font = font.label(),
                "monospace mode on a font whose digits differ in width"
            );
        }
    }
}

/// Character drawn under a variant when debugging
fn annotation_mark(role: DigitRole) -> Option<char> {
    match role {
        DigitRole::Plain(_) => None,
        DigitRole::CapturePlaceholder(..) => Some('c'),
        DigitRole::PhaseShiftPositional(phase, ..) => {
            char::from_digit(phase.number() as u32, 10)
        }
        DigitRole::LeftGroupMember(_) | DigitRole::RightGroupRemainder => Some('g'),
        DigitRole::LeftGroupWithSeparator(..) | DigitRole::RightGroupWithSeparator(_) => Some('s'),
    }
}
