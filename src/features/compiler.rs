//! Digit grouping rules
//!
//! OpenType rules can only look at a bounded window around one glyph, so
//! counting is done with tags: every digit is first tagged with the direction
//! it groups in, then a chain of phase tags walks away from the anchor of the
//! run (its right end for integers, the decimal point for fractions). A digit
//! whose neighbour carries phase `p` gets phase `p + 1`; the last phase of a
//! group becomes a GROUP tag if the run continues past it. One reverse pass
//! (integers) or one forward pass (fractions) is enough because each step
//! only reads the tag its neighbour received earlier in the same pass.
//!
//! Lookups, in execution order:
//!
//! 1. `CAPTURE`: tag digits as integer, fraction or hex
//! 2. `DOTS_TO_COMMAS`: decimal point to decimal comma
//! 3. `GROUP_DIGITS` / `GROUP_NIBBLES`: phase chain for integer and hex runs
//! 4. `GROUP_DECIMALS`: phase chain for fractions
//! 5. `REFLOW_DIGITS`: tags to drawn glyphs
//! 6. `SEPARATE_COMMAS` / `SEPARATE_DOTS`: gaps to punctuation

use crate::core::settings::GroupingConfig;
use crate::features::ir::{Direction, FeatureProgram, ProgramBuilder, Rule, Slot};
use crate::glyphs::roles::{DigitRole, GlyphTables, Phase, Radix, SeparatorKind, Side};

pub const CAPTURE: &str = "CAPTURE";
pub const DOTS_TO_COMMAS: &str = "DOTS_TO_COMMAS";
pub const GROUP_DIGITS: &str = "GROUP_DIGITS";
pub const GROUP_NIBBLES: &str = "GROUP_NIBBLES";
pub const GROUP_DECIMALS: &str = "GROUP_DECIMALS";
pub const REFLOW_DIGITS: &str = "REFLOW_DIGITS";
pub const SEPARATE_COMMAS: &str = "SEPARATE_COMMAS";
pub const SEPARATE_DOTS: &str = "SEPARATE_DOTS";

/// Lookups of the always-on entry feature
pub const ENTRY_LOOKUPS: &[&str] = &[CAPTURE, GROUP_DIGITS, GROUP_NIBBLES, REFLOW_DIGITS];

/// Separator styles selectable on top of the entry feature
pub const LOCALE_FEATURES: &[(&str, &[&str])] = &[
    // 1,234.5678
    ("ss01", &[CAPTURE, GROUP_DIGITS, REFLOW_DIGITS, SEPARATE_COMMAS]),
    // 1,234.567 8
    (
        "ss02",
        &[CAPTURE, GROUP_DIGITS, GROUP_DECIMALS, REFLOW_DIGITS, SEPARATE_COMMAS],
    ),
    // 1.234,5678
    (
        "ss03",
        &[CAPTURE, DOTS_TO_COMMAS, GROUP_DIGITS, REFLOW_DIGITS, SEPARATE_DOTS],
    ),
    // 1.234,567 8
    (
        "ss04",
        &[
            CAPTURE,
            DOTS_TO_COMMAS,
            GROUP_DIGITS,
            GROUP_DECIMALS,
            REFLOW_DIGITS,
            SEPARATE_DOTS,
        ],
    ),
];

pub const LANGUAGE_SYSTEMS: &[(&str, &str)] = &[
    ("DFLT", "dflt"),
    ("latn", "dflt"),
    ("cyrl", "dflt"),
    ("grek", "dflt"),
    ("kana", "dflt"),
];

const POINT: &str = "point";
const DECIMAL_COMMA: &str = "decimal_comma";
const HEX_PREFIX: &str = "hex_prefix";

/// Settings the rule program depends on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileOptions {
    pub feature_tag: String,
    /// Phase tags are the final glyphs (they carry the shifts)
    pub monospace: bool,
}

impl From<&GroupingConfig> for CompileOptions {
    fn from(config: &GroupingConfig) -> Self {
        Self {
            feature_tag: config.feature_tag.clone(),
            monospace: config.monospace,
        }
    }
}

fn class(role: DigitRole) -> Slot {
    Slot::class(role.tag())
}

fn any(roles: impl IntoIterator<Item = DigitRole>) -> Slot {
    Slot::any(roles.into_iter().map(|role| role.tag()))
}

fn cap(side: Side, radix: Radix) -> DigitRole {
    DigitRole::CapturePlaceholder(side, radix)
}

fn phase(phase: Phase, side: Side, radix: Radix) -> DigitRole {
    DigitRole::PhaseShiftPositional(phase, side, radix)
}

/// Build the rule program for a font's glyph tables.
///
/// Pure: the same tables and options always give the same program.
pub fn compile(tables: &GlyphTables, options: &CompileOptions) -> FeatureProgram {
    let mut builder = ProgramBuilder::new(LANGUAGE_SYSTEMS);

    for (role, digit_class) in &tables.classes {
        builder.class(role.tag(), digit_class.glyphs().to_vec());
    }
    builder.class(POINT, tables.point.iter().cloned().collect());
    builder.class(DECIMAL_COMMA, tables.comma.iter().cloned().collect());
    builder.class(HEX_PREFIX, tables.hex_prefix.clone());

    let hex: Vec<Radix> = [Radix::Hex, Radix::HexUpper]
        .into_iter()
        .filter(|radix| tables.has_radix(*radix))
        .collect();

    builder.lookup(CAPTURE, Direction::Forward, capture_rules(tables, &hex));
    builder.lookup(DOTS_TO_COMMAS, Direction::Forward, dots_to_commas_rules());
    builder.lookup(
        GROUP_DIGITS,
        Direction::Reverse,
        group_left_rules(&[Radix::Decimal]),
    );
    builder.lookup(GROUP_NIBBLES, Direction::Reverse, group_left_rules(&hex));
    builder.lookup(GROUP_DECIMALS, Direction::Forward, group_decimal_rules());
    builder.lookup(
        REFLOW_DIGITS,
        Direction::Forward,
        reflow_rules(tables, options.monospace),
    );
    builder.lookup(
        SEPARATE_COMMAS,
        Direction::Forward,
        separator_rules(SeparatorKind::Comma),
    );
    builder.lookup(
        SEPARATE_DOTS,
        Direction::Forward,
        separator_rules(SeparatorKind::Dot),
    );

    builder.feature(&options.feature_tag, ENTRY_LOOKUPS);
    for (tag, lookups) in LOCALE_FEATURES {
        builder.feature(tag, lookups);
    }
    builder.finish()
}

/// Tag every digit with its grouping direction. Order matters: the first
/// rule that matches at a position wins, so specific rules come first and
/// the catch-all comes last.
fn capture_rules(tables: &GlyphTables, hex: &[Radix]) -> Vec<Rule> {
    let digits = class(DigitRole::Plain(Radix::Decimal));
    let cap_l = cap(Side::Left, Radix::Decimal);
    let cap_r = cap(Side::Right, Radix::Decimal);
    let mut rules = Vec::new();

    let zero = tables.class(cap_l).and_then(|c| c.get(0)).map(Slot::glyph);
    if let (Some(zero), false) = (zero, hex.is_empty()) {
        let hex_inputs = any(hex.iter().map(|&r| DigitRole::Plain(r)));
        let hex_caps = any(hex.iter().map(|&r| cap(Side::Left, r)));
        let prefix = Slot::class(HEX_PREFIX);

        // "10x5": the zero ends a decimal run, so no hex prefix
        let inside_run = vec![any([cap_l, cap_r]), zero.clone(), prefix.clone()];
        rules.push(Rule::context(
            inside_run.clone(),
            digits.clone(),
            vec![],
            class(cap_l),
        ));
        rules.push(Rule::ignore(inside_run, hex_inputs, vec![]));

        // Decimal digits are in both hex classes; the lowercase rule is
        // listed first and claims them.
        for &radix in hex {
            rules.push(Rule::context(
                vec![zero.clone(), prefix.clone()],
                class(DigitRole::Plain(radix)),
                vec![],
                class(cap(Side::Left, radix)),
            ));
        }
        for &radix in hex {
            rules.push(Rule::context(
                vec![hex_caps.clone()],
                class(DigitRole::Plain(radix)),
                vec![],
                class(cap(Side::Left, radix)),
            ));
        }
    }

    // "1.5" but not "..5": the point must follow an integer digit
    rules.push(Rule::context(
        vec![class(cap_l), Slot::class(POINT)],
        digits.clone(),
        vec![],
        class(cap_r),
    ));
    rules.push(Rule::context(
        vec![class(cap_l)],
        digits.clone(),
        vec![],
        class(cap_l),
    ));
    rules.push(Rule::context(
        vec![class(cap_r)],
        digits.clone(),
        vec![],
        class(cap_r),
    ));
    rules.push(Rule::context(vec![], digits, vec![], class(cap_l)));
    rules
}

fn dots_to_commas_rules() -> Vec<Rule> {
    vec![Rule::context(
        vec![class(cap(Side::Left, Radix::Decimal))],
        Slot::class(POINT),
        vec![class(cap(Side::Right, Radix::Decimal))],
        Slot::class(DECIMAL_COMMA),
    )]
}

/// Reverse phase chain for runs anchored at their right end.
///
/// `radices` share one run (upper and lower case hex letters may mix), so
/// context slots accept the tags of all of them.
fn group_left_rules(radices: &[Radix]) -> Vec<Rule> {
    let Some(&first) = radices.first() else {
        return Vec::new();
    };
    let phases = Phase::sequence(first.group_size());
    let (Some(&last), Some(&before_last)) = (phases.last(), phases.iter().rev().nth(1)) else {
        return Vec::new();
    };
    let caps = any(radices.iter().map(|&r| cap(Side::Left, r)));
    let phase_any = |p: Phase| any(radices.iter().map(|&r| phase(p, Side::Left, r)));

    let mut rules = Vec::new();
    for &radix in radices {
        let input = class(cap(Side::Left, radix));

        // Last phase with more of the run on its left: group boundary
        rules.push(Rule::context(
            vec![caps.clone()],
            input.clone(),
            vec![phase_any(before_last)],
            class(DigitRole::LeftGroupMember(radix)),
        ));
        rules.push(Rule::context(
            vec![],
            input.clone(),
            vec![phase_any(before_last)],
            class(phase(last, Side::Left, radix)),
        ));
        for &p in phases {
            match p.next() {
                Some(next) if next != last => rules.push(Rule::context(
                    vec![],
                    input.clone(),
                    vec![phase_any(p)],
                    class(phase(next, Side::Left, radix)),
                )),
                _ => {}
            }
        }
        // Run end, or right after a group boundary
        rules.push(Rule::context(
            vec![],
            input,
            vec![],
            class(phase(Phase::One, Side::Left, radix)),
        ));
    }
    rules
}

/// Forward phase chain for fractions, anchored at the decimal point
fn group_decimal_rules() -> Vec<Rule> {
    let radix = Radix::Decimal;
    let phases = Phase::sequence(radix.group_size());
    let Some(&last) = phases.last() else {
        return Vec::new();
    };
    let input = class(cap(Side::Right, radix));
    let group = class(DigitRole::RightGroupRemainder);
    let first = class(phase(Phase::One, Side::Right, radix));

    let mut rules = vec![
        Rule::context(
            vec![Slot::any([POINT, DECIMAL_COMMA])],
            input.clone(),
            vec![],
            first.clone(),
        ),
        Rule::context(vec![group.clone()], input.clone(), vec![], first),
    ];
    for &p in phases {
        let Some(next) = p.next() else { continue };
        if next == last {
            // A group boundary only if another fractional digit follows
            rules.push(Rule::context(
                vec![class(phase(p, Side::Right, radix))],
                input.clone(),
                vec![input.clone()],
                group.clone(),
            ));
        }
        if next.number() <= last.number() {
            rules.push(Rule::context(
                vec![class(phase(p, Side::Right, radix))],
                input.clone(),
                vec![],
                class(phase(next, Side::Right, radix)),
            ));
        }
    }
    rules
}

/// Map tags to drawn glyphs
fn reflow_rules(tables: &GlyphTables, monospace: bool) -> Vec<Rule> {
    let mut rules = Vec::new();
    for radix in Radix::ALL {
        if !tables.has_radix(radix) {
            continue;
        }
        let plain = class(DigitRole::Plain(radix));
        let mut sides = vec![Side::Left];
        if radix == Radix::Decimal {
            sides.push(Side::Right);
        }

        for side in sides {
            rules.push(Rule::single(class(cap(side, radix)), plain.clone()));
            if !monospace {
                for &p in Phase::sequence(radix.group_size()) {
                    rules.push(Rule::single(class(phase(p, side, radix)), plain.clone()));
                }
            }
        }

        rules.push(Rule::single(
            class(DigitRole::LeftGroupMember(radix)),
            class(DigitRole::LeftGroupWithSeparator(SeparatorKind::Space, radix)),
        ));
        if radix == Radix::Decimal {
            rules.push(Rule::single(
                class(DigitRole::RightGroupRemainder),
                class(DigitRole::RightGroupWithSeparator(SeparatorKind::Space)),
            ));
        }
    }
    rules
}

/// Swap the plain gap of integer groups for punctuation
fn separator_rules(kind: SeparatorKind) -> Vec<Rule> {
    vec![Rule::single(
        class(DigitRole::LeftGroupWithSeparator(SeparatorKind::Space, Radix::Decimal)),
        class(DigitRole::LeftGroupWithSeparator(kind, Radix::Decimal)),
    )]
}
