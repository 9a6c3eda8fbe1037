//! Digit roles and the name tables shared by the glyph factory and the
//! feature compiler
//!
//! Every generated glyph is addressed purely by pattern: `<tag>_d<index>`,
//! where the tag encodes the role and the index is the digit value.

use std::collections::BTreeMap;
use std::fmt;

/// Number system a digit run is written in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Radix {
    Decimal,
    /// `0-9a-f`
    Hex,
    /// `0-9A-F`
    HexUpper,
}

impl Radix {
    pub const ALL: [Radix; 3] = [Radix::Decimal, Radix::Hex, Radix::HexUpper];

    /// Characters in digit-value order
    pub fn chars(self) -> &'static str {
        match self {
            Radix::Decimal => "0123456789",
            Radix::Hex => "0123456789abcdef",
            Radix::HexUpper => "0123456789ABCDEF",
        }
    }

    pub fn digit_count(self) -> usize {
        self.chars().len()
    }

    /// Digits per visual group
    pub fn group_size(self) -> usize {
        match self {
            Radix::Decimal => 3,
            Radix::Hex | Radix::HexUpper => 4,
        }
    }

    pub fn is_hex(self) -> bool {
        !matches!(self, Radix::Decimal)
    }

    fn suffix(self) -> &'static str {
        match self {
            Radix::Decimal => "",
            Radix::Hex => "x",
            Radix::HexUpper => "xu",
        }
    }
}

/// Which side of a run a tag groups from.
///
/// `Left` runs are integer (or hex) digits grouped from the right edge of the
/// run, `Right` runs are fractional digits grouped from the decimal point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    fn suffix(self) -> &'static str {
        match self {
            Side::Left => "l",
            Side::Right => "r",
        }
    }
}

/// Position of a digit inside its group.
///
/// On the left side phases count from the right edge of the group, on the
/// right side from the decimal point. The last phase of a group is the one
/// that may turn into a GROUP tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    One,
    Two,
    Three,
    Four,
}

static PHASE_ORDER: [Phase; 4] = [Phase::One, Phase::Two, Phase::Three, Phase::Four];

impl Phase {
    /// The phases of a group of `group_size` digits, in firing order
    pub fn sequence(group_size: usize) -> &'static [Phase] {
        &PHASE_ORDER[..group_size.clamp(1, PHASE_ORDER.len())]
    }

    pub fn number(self) -> usize {
        match self {
            Phase::One => 1,
            Phase::Two => 2,
            Phase::Three => 3,
            Phase::Four => 4,
        }
    }

    pub fn next(self) -> Option<Phase> {
        PHASE_ORDER.get(self.number()).copied()
    }
}

/// Glyph drawn in the gap between two groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SeparatorKind {
    /// Gap only
    Space,
    Dot,
    Comma,
}

impl SeparatorKind {
    fn name(self) -> &'static str {
        match self {
            SeparatorKind::Space => "space",
            SeparatorKind::Dot => "dot",
            SeparatorKind::Comma => "comma",
        }
    }
}

/// Visual or internal role of a digit glyph
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DigitRole {
    /// The font's own digits
    Plain(Radix),
    CapturePlaceholder(Side, Radix),
    PhaseShiftPositional(Phase, Side, Radix),
    /// GROUP tag on the integer or hex side
    LeftGroupMember(Radix),
    /// GROUP tag on the fractional side
    RightGroupRemainder,
    LeftGroupWithSeparator(SeparatorKind, Radix),
    RightGroupWithSeparator(SeparatorKind),
}

impl DigitRole {
    /// Stable identifier used both as glyph class name and glyph name prefix
    pub fn tag(&self) -> String {
        match *self {
            DigitRole::Plain(Radix::Decimal) => "digits".to_string(),
            DigitRole::Plain(Radix::Hex) => "hex".to_string(),
            DigitRole::Plain(Radix::HexUpper) => "hexu".to_string(),
            DigitRole::CapturePlaceholder(side, radix) => {
                format!("cap_{}{}", side.suffix(), radix.suffix())
            }
            DigitRole::PhaseShiftPositional(phase, side, radix) => {
                format!("ph{}_{}{}", phase.number(), side.suffix(), radix.suffix())
            }
            DigitRole::LeftGroupMember(radix) => format!("grp_l{}", radix.suffix()),
            DigitRole::RightGroupRemainder => "grp_r".to_string(),
            DigitRole::LeftGroupWithSeparator(kind, radix) => {
                format!("sep_{}_l{}", kind.name(), radix.suffix())
            }
            DigitRole::RightGroupWithSeparator(kind) => format!("sep_{}_r", kind.name()),
        }
    }

    pub fn glyph_name(&self, index: usize) -> String {
        format!("{}_d{}", self.tag(), index)
    }

    pub fn radix(&self) -> Radix {
        match *self {
            DigitRole::Plain(radix)
            | DigitRole::CapturePlaceholder(_, radix)
            | DigitRole::PhaseShiftPositional(_, _, radix)
            | DigitRole::LeftGroupMember(radix)
            | DigitRole::LeftGroupWithSeparator(_, radix) => radix,
            DigitRole::RightGroupRemainder | DigitRole::RightGroupWithSeparator(_) => {
                Radix::Decimal
            }
        }
    }

    /// Roles needed for a radix, in generation order
    pub fn roles_for(radix: Radix, separators: &[SeparatorKind]) -> Vec<DigitRole> {
        let mut roles = vec![DigitRole::CapturePlaceholder(Side::Left, radix)];
        roles.extend(
            Phase::sequence(radix.group_size())
                .iter()
                .map(|&phase| DigitRole::PhaseShiftPositional(phase, Side::Left, radix)),
        );
        roles.push(DigitRole::LeftGroupMember(radix));
        roles.push(DigitRole::LeftGroupWithSeparator(SeparatorKind::Space, radix));

        if radix == Radix::Decimal {
            roles.extend(
                separators
                    .iter()
                    .filter(|kind| **kind != SeparatorKind::Space)
                    .map(|&kind| DigitRole::LeftGroupWithSeparator(kind, radix)),
            );
            roles.push(DigitRole::CapturePlaceholder(Side::Right, radix));
            roles.extend(
                Phase::sequence(radix.group_size())
                    .iter()
                    .map(|&phase| DigitRole::PhaseShiftPositional(phase, Side::Right, radix)),
            );
            roles.push(DigitRole::RightGroupRemainder);
            roles.push(DigitRole::RightGroupWithSeparator(SeparatorKind::Space));
        }
        roles
    }
}

impl fmt::Display for DigitRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag())
    }
}

/// Glyph names of one role, indexed by digit value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitClass {
    radix: Radix,
    glyphs: Vec<String>,
}

impl DigitClass {
    /// Build a class, checking it has exactly one glyph per digit value
    pub fn new(radix: Radix, glyphs: Vec<String>) -> Option<Self> {
        (glyphs.len() == radix.digit_count()).then_some(Self { radix, glyphs })
    }

    /// Names following the `<tag>_d<index>` convention
    pub fn for_role(role: DigitRole) -> Self {
        let radix = role.radix();
        Self {
            radix,
            glyphs: (0..radix.digit_count()).map(|i| role.glyph_name(i)).collect(),
        }
    }

    pub fn radix(&self) -> Radix {
        self.radix
    }

    pub fn glyphs(&self) -> &[String] {
        &self.glyphs
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.glyphs.get(index).map(String::as_str)
    }
}

/// Everything the compiler needs to know about the patched font
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GlyphTables {
    pub classes: BTreeMap<DigitRole, DigitClass>,
    /// Decimal point glyph
    pub point: Option<String>,
    /// Comma glyph used for decimal commas
    pub comma: Option<String>,
    /// `x` and `X`, whichever exist
    pub hex_prefix: Vec<String>,
}

impl GlyphTables {
    pub fn class(&self, role: DigitRole) -> Option<&DigitClass> {
        self.classes.get(&role)
    }

    pub fn has_radix(&self, radix: Radix) -> bool {
        self.classes.contains_key(&DigitRole::Plain(radix))
    }
}
